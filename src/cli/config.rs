// ABOUTME: CLI config command: print the effective configuration or write the defaults

use anyhow::{Context, Result};
use std::path::Path;

use super::{ConfigArgs, OutputFormat};
use crate::config::AppConfig;

/// Execute the config command
pub fn execute(args: &ConfigArgs, path: &Path, format: OutputFormat) -> Result<()> {
    if args.init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            AppConfig::default().save_to(path)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let mut config = AppConfig::load_from(path)?;
    if config.api.token.is_some() {
        config.api.token = Some("********".to_string());
    }

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?
        ),
        OutputFormat::Text => {
            let source = if path.exists() { "" } else { " (not found, using defaults)" };
            println!("# {}{source}", path.display());
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
    }
    Ok(())
}
