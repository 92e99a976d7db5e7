//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options. Run inputs mirror the GitHub
//! Actions input plumbing via `INPUT_*` environment fallbacks, so the
//! binary works unchanged inside a workflow step.
//!
//! # Commands
//!
//! - `run`: Execute the full reporting pipeline
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Run against a local working directory
//! tfreport run ./terraform
//!
//! # Run inside CI (inputs arrive via environment)
//! tfreport run
//!
//! # Render a plain-text summary instead of markdown
//! tfreport run ./terraform --format text
//!
//! # Initialize configuration
//! tfreport init
//!
//! # Validate configuration
//! tfreport validate tfreport.yaml
//! ```

use crate::reporter::RenderFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tfreport - CI complexity reporting for Terraform/OpenTofu repositories.
#[derive(Parser, Debug)]
#[command(
    name = "tfreport",
    author,
    version,
    about = "CI complexity reporting for Terraform/OpenTofu repositories",
    long_about = "tfreport scans a directory tree for Terraform definition files, derives \
                  per-file and aggregate complexity counts, attaches commit/actor \
                  provenance from the triggering CI event, persists a JSON artifact, and \
                  renders a summary table into the CI step summary."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TFREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute the full reporting pipeline
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Working directory to scan for Terraform files
    #[arg(value_name = "PATH", env = "INPUT_WORKING_DIRECTORY", default_value = "./terraform")]
    pub working_directory: PathBuf,

    /// GitHub token for the pull-request list API
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Inline JSON trigger event payload
    #[arg(long, value_name = "JSON", env = "INPUT_EVENT")]
    pub event: Option<String>,

    /// Path to a JSON trigger event payload file
    #[arg(long, value_name = "FILE", env = "GITHUB_EVENT_PATH")]
    pub event_file: Option<PathBuf>,

    /// Regex a file path must match to be included
    #[arg(long, value_name = "REGEX", env = "INPUT_INCLUDEDFILETYPES")]
    pub included_file_types: Option<String>,

    /// Regex that excludes matching file paths
    #[arg(long, value_name = "REGEX", env = "INPUT_EXCLUDEDFILETYPES")]
    pub excluded_file_types: Option<String>,

    /// Directory the JSON artifact is written into
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<String>,

    /// Human-readable summary format
    #[arg(short, long, default_value = "markdown", value_enum)]
    pub format: RenderFormat,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "tfreport.yaml")]
    pub config: PathBuf,
}
