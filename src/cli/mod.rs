// ABOUTME: CLI argument parsing and command routing for template-wizard
//
// Provides command-line interface for:
// - Running the interactive wizard (tui, default)
// - Replaying a scripted session headlessly (replay)
// - Showing how a file would be routed through the steps (classify)
// - Inspecting or creating the config file (config)

pub mod classify;
pub mod config;
pub mod replay;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Upload a design file and turn it into a reusable page template
#[derive(Parser)]
#[command(name = "template-wizard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of ~/.template-wizard/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive wizard (default if no command given)
    Tui,

    /// Drive the wizard from a JSON list of step data entries
    Replay(ReplayArgs),

    /// Show the step sequence a file would get
    Classify(ClassifyArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the replay command
#[derive(clap::Args)]
pub struct ReplayArgs {
    /// JSON file containing an array of step data entries
    pub script: PathBuf,

    /// Build the payload without sending it to the API
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the classify command
#[derive(clap::Args)]
pub struct ClassifyArgs {
    /// Design file to inspect
    pub file: String,
}

/// Arguments for the config command
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Write the default config file if none exists
    #[arg(long)]
    pub init: bool,
}
