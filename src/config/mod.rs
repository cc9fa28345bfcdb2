// ABOUTME: Configuration management for template-wizard
// Handles the template API connection, category choices, and UI preferences

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "TEMPLATE_WIZARD_API_URL";
/// Environment variable overriding `api.token`
pub const API_TOKEN_ENV: &str = "TEMPLATE_WIZARD_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Template API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Categories offered by the metadata step
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryOption>,

    /// UI preferences
    #[serde(default)]
    pub ui: UiPreferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the template API (e.g. http://localhost:3000)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// Seconds to wait for a submission before reporting a timeout
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs.max(1))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            submit_timeout_secs: default_submit_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
}

impl CategoryOption {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Whether to show the step description under the progress indicator
    #[serde(default = "default_true")]
    pub show_descriptions: bool,

    /// Ask before discarding the wizard on cancel
    #[serde(default = "default_true")]
    pub confirm_cancel: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            show_descriptions: true,
            confirm_cancel: true,
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_submit_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("template-wizard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_categories() -> Vec<CategoryOption> {
    vec![
        CategoryOption::new("landing", "Landing Page"),
        CategoryOption::new("blog", "Blog"),
        CategoryOption::new("product", "Product"),
        CategoryOption::new("event", "Event"),
    ]
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from the user config file, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the base template-wizard directory
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".template-wizard"))
    }

    /// Get the path to the user config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token);
        }
    }

    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            categories: default_categories(),
            ui: UiPreferences::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.submit_timeout(), Duration::from_secs(30));
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.category_name("blog"), Some("Blog"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://cms.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://cms.example.com");
        assert_eq!(config.api.submit_timeout_secs, 30);
        assert!(config.ui.confirm_cancel);
        assert!(!config.categories.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.api.submit_timeout_secs = 5;
        config.categories = vec![CategoryOption::new("docs", "Docs")];
        config.save_to(&path).unwrap();

        let loaded: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            API_URL_ENV => Some("https://staging.example.com".to_string()),
            API_TOKEN_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://staging.example.com");
        assert_eq!(config.api.token, None);
    }
}
