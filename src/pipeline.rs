//! Pipeline orchestration.
//!
//! Drives a whole reporting run: scan the working directory, fan the
//! metrics calculator out over every discovered file (concurrently, with
//! per-file failure isolation and input-order preservation), aggregate the
//! counts, resolve provenance, assemble the report, render the
//! human-readable summary, and persist the JSON artifact.

use crate::config::Config;
use crate::error::Result;
use crate::event::TriggerEvent;
use crate::github::PullRequestLookup;
use crate::metrics::MetricsCalculator;
use crate::provenance::ProvenanceResolver;
use crate::report::{FileResult, Report, RunContext};
use crate::reporter::{write_step_summary, Reporter};
use crate::scanner::Scanner;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed diagnostic embedded in failure entries. Raw parser detail is
/// intentionally discarded so the artifact stays stable across parser
/// versions.
pub const PARSE_FAILURE_MESSAGE: &str =
    "failed to generate report for file, possible syntactical issue";

/// Orchestrates one end-to-end reporting run.
pub struct Pipeline {
    config: Config,
    reporter: Reporter,
}

impl Pipeline {
    /// Create a pipeline with an injected reporter.
    #[must_use]
    pub const fn new(config: Config, reporter: Reporter) -> Self {
        Self { config, reporter }
    }

    /// Run the pipeline and return the persisted artifact path.
    ///
    /// # Errors
    ///
    /// Fatal errors are scanner root failures, pull-request API transport
    /// failures, and artifact persistence failures. Per-file parse failures
    /// are isolated into failure entries and never abort the run.
    pub async fn run(
        &self,
        event: &TriggerEvent,
        context: &RunContext,
        lookup: &dyn PullRequestLookup,
        root: &Path,
    ) -> Result<PathBuf> {
        // 1. Discover files; a bad root is fatal.
        let scanner = Scanner::new(&self.config)?;
        let files = scanner.scan(root)?;

        // 2. Concurrent per-file analysis. join_all keeps results in input
        //    order, so the report's file list follows scanner order rather
        //    than completion order.
        let calculator = MetricsCalculator::new();
        let tasks = files.iter().map(|file| {
            let calculator = &calculator;
            async move {
                match calculator.calculate(file).await {
                    Ok(metrics) => FileResult::Success {
                        file: file.clone(),
                        report: metrics,
                    },
                    Err(e) => {
                        if e.is_recoverable() {
                            tracing::warn!(file = %file.display(), error = %e, "Failed to analyze file");
                        } else {
                            tracing::error!(file = %file.display(), error = %e, "Failed to read file");
                        }
                        FileResult::Failure {
                            file: file.clone(),
                            error: PARSE_FAILURE_MESSAGE.to_string(),
                        }
                    }
                }
            }
        });
        let results = futures::future::join_all(tasks).await;

        // 3. Provenance; only the network call can fail here, fatally.
        let resolver = ProvenanceResolver::new(lookup);
        let provenance = resolver.resolve(event, context).await?;

        // 4. Assemble (aggregation over successes happens inside).
        let report = Report::assemble(context, results, provenance);
        tracing::info!(
            files = report.files.len(),
            managed = report.summary.managed_resources,
            data = report.summary.data_resources,
            modules = report.summary.module_calls,
            "Report assembled"
        );

        // 5. Human-readable rendering must not block persistence.
        match self.reporter.render(&report) {
            Ok(rendered) => {
                if let Err(e) = write_step_summary(&rendered) {
                    tracing::warn!(error = %e, "Failed to write step summary");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render report summary");
            }
        }

        // 6. Persist the artifact.
        let artifact_path = self.persist(&report)?;

        // 7. Surface the artifact path as a named run output, best effort.
        if let Err(e) = write_run_output("export_filename", &artifact_path.to_string_lossy()) {
            tracing::warn!(error = %e, "Failed to write run output");
        }

        Ok(artifact_path)
    }

    /// Write the report JSON under the artifact directory, keyed by SHA.
    /// Directory creation is idempotent; an existing artifact for the same
    /// SHA is overwritten.
    fn persist(&self, report: &Report) -> Result<PathBuf> {
        let dir = PathBuf::from(&self.config.output.report_dir);
        std::fs::create_dir_all(&dir)
            .map_err(|e| crate::error::TfReportError::io(&dir, e, file!(), line!()))?;

        let stem = if report.sha.is_empty() {
            "report".to_string()
        } else {
            report.sha.clone()
        };
        let filename = if self.config.output.filename_suffix.is_empty() {
            format!("{stem}.json")
        } else {
            format!("{stem}-{}.json", self.config.output.filename_suffix)
        };
        let path = dir.join(filename);

        let json = if self.config.output.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        std::fs::write(&path, json)
            .map_err(|e| crate::error::TfReportError::io(&path, e, file!(), line!()))?;

        tracing::info!(path = %path.display(), "Report artifact written");
        Ok(path)
    }
}

/// Append a `name=value` line to the runner's output file
/// (`GITHUB_OUTPUT`), when present.
fn write_run_output(name: &str, value: &str) -> Result<()> {
    let Some(path) = std::env::var_os("GITHUB_OUTPUT") else {
        tracing::debug!("GITHUB_OUTPUT not set, skipping run output");
        return Ok(());
    };
    let path = PathBuf::from(path);

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| crate::error::TfReportError::io(&path, e, file!(), line!()))?;
    writeln!(file, "{name}={value}")
        .map_err(|e| crate::error::TfReportError::io(&path, e, file!(), line!()))?;
    Ok(())
}
