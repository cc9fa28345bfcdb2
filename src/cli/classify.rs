// ABOUTME: CLI classify command: stage a file and list the wizard steps it would go through

use anyhow::{Context, Result};
use serde::Serialize;

use super::{ClassifyArgs, OutputFormat};
use crate::components::steps::upload::stage_local_file;
use crate::wizard::{resolve_logical_step, total_steps_for, LogicalStep};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub requires_component_definition: bool,
    pub total_steps: usize,
    pub steps: Vec<LogicalStep>,
}

/// Work out the step sequence for a file on disk
pub fn classify(input: &str) -> Result<Classification> {
    let upload = stage_local_file(input)?;
    let png = upload.requires_component_definition();
    let total_steps = total_steps_for(png);
    let steps = (1..=total_steps)
        .filter_map(|n| resolve_logical_step(n, total_steps))
        .collect();

    Ok(Classification {
        file_name: upload.file_name,
        mime_type: upload.mime_type,
        size_bytes: upload.size_bytes,
        requires_component_definition: png,
        total_steps,
        steps,
    })
}

/// Execute the classify command
pub fn execute(args: &ClassifyArgs, format: OutputFormat) -> Result<()> {
    let classification = classify(&args.file)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&classification)
                .context("Failed to serialize classification")?
        ),
        OutputFormat::Text => {
            println!(
                "{} ({}, {} bytes)",
                classification.file_name, classification.mime_type, classification.size_bytes
            );
            if classification.requires_component_definition {
                println!("PNG design: components must be marked out by hand");
            }
            for (i, step) in classification.steps.iter().enumerate() {
                println!("  {}/{}  {}", i + 1, classification.total_steps, step.title());
            }
        }
    }
    Ok(())
}
