//! # tfreport
//!
//! CI complexity reporting for Terraform/OpenTofu repositories.
//!
//! tfreport scans a directory tree for Terraform definition files, parses
//! each one with HCL, derives per-file and aggregate complexity counts
//! (managed resources, data resources, module calls), attaches commit/actor
//! provenance from the triggering CI event, persists a timestamped JSON
//! artifact keyed by commit SHA, and renders a summary table into the CI
//! run's step summary.
//!
//! ## Features
//!
//! - **Recursive scanning**: regex include/exclude filters, with
//!   version-control and dependency-cache directories pruned at any depth
//! - **Per-file isolation**: a file that fails to parse becomes a failure
//!   entry in the report; it never aborts the run
//! - **Provenance resolution**: push events are matched back to their
//!   merged pull request via the merge-commit SHA; pull-request events use
//!   the embedded payload directly
//! - **Canonical artifact**: one versioned JSON schema, written exactly
//!   once per run
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfreport::{Config, GitHubClient, Pipeline, Reporter, RunContext, TriggerEvent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let github = GitHubClient::new(&config)?;
//!     let pipeline = Pipeline::new(config, Reporter::default());
//!
//!     let event = TriggerEvent::default();
//!     let context = RunContext::from_env();
//!     let artifact = pipeline
//!         .run(&event, &context, &github, "./terraform".as_ref())
//!         .await?;
//!
//!     println!("{}", artifact.display());
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod metrics;
pub mod pipeline;
pub mod provenance;
pub mod report;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Result, TfReportError};
pub use event::TriggerEvent;
pub use github::{GitHubClient, PullRequestLookup};
pub use metrics::MetricsCalculator;
pub use pipeline::Pipeline;
pub use provenance::ProvenanceResolver;
pub use report::{AggregateSummary, FileMetrics, FileResult, Provenance, Report, RunContext};
pub use reporter::{RenderFormat, Reporter};
pub use scanner::Scanner;
