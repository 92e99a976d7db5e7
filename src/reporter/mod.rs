//! Human-readable report rendering.
//!
//! The pipeline persists the JSON artifact itself; this module covers the
//! run's human-readable surfaces:
//! - Markdown: tables for the CI step summary (`GITHUB_STEP_SUMMARY`)
//! - Text: comfy-table output for local runs
//!
//! Rendering is an explicit collaborator injected into the pipeline; a
//! rendering failure is logged and never blocks artifact persistence.

mod markdown;
mod text;

use crate::error::Result;
use crate::report::Report;
use std::io::Write;
use std::path::PathBuf;

pub use markdown::MarkdownRenderer;
pub use text::TextRenderer;

/// Output format of the human-readable summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderFormat {
    /// Markdown tables for the CI step summary.
    Markdown,
    /// Plain text tables for terminals.
    Text,
}

/// Trait for report renderers.
pub trait ReportRenderer {
    /// Render a report into a human-readable string.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&self, report: &Report) -> Result<String>;
}

/// Report renderer dispatching on the requested format.
pub struct Reporter {
    format: RenderFormat,
}

impl Reporter {
    /// Create a reporter for the given format.
    #[must_use]
    pub const fn new(format: RenderFormat) -> Self {
        Self { format }
    }

    /// Render a report in the configured format.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&self, report: &Report) -> Result<String> {
        match self.format {
            RenderFormat::Markdown => MarkdownRenderer::new().render(report),
            RenderFormat::Text => TextRenderer::new().render(report),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(RenderFormat::Markdown)
    }
}

/// Append rendered markdown to the CI step-summary file, when the runner
/// provides one via `GITHUB_STEP_SUMMARY`.
///
/// Returns the summary file path when something was written. A missing
/// variable is a local run, not an error.
///
/// # Errors
///
/// Returns `Io` if the summary file cannot be appended to.
pub fn write_step_summary(rendered: &str) -> Result<Option<PathBuf>> {
    let Some(path) = std::env::var_os("GITHUB_STEP_SUMMARY") else {
        tracing::debug!("GITHUB_STEP_SUMMARY not set, skipping step summary");
        return Ok(None);
    };
    let path = PathBuf::from(path);

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| crate::error::TfReportError::io(&path, e, file!(), line!()))?;
    file.write_all(rendered.as_bytes())
        .map_err(|e| crate::error::TfReportError::io(&path, e, file!(), line!()))?;

    tracing::info!(path = %path.display(), "Step summary written");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Provenance, Report, RunContext};

    fn sample_report() -> Report {
        Report::assemble(
            &RunContext {
                sha: "abc123".to_string(),
                git_ref: "refs/heads/main".to_string(),
                repository: "octo/infra".to_string(),
                actor: "alice".to_string(),
            },
            Vec::new(),
            Provenance {
                head: Some("feature/x".to_string()),
                actor: "alice".to_string(),
                actor_name: None,
            },
        )
    }

    #[test]
    fn test_reporter_dispatch() {
        let report = sample_report();

        let markdown = Reporter::new(RenderFormat::Markdown).render(&report).unwrap();
        assert!(markdown.contains("| Actor |"));

        let text = Reporter::new(RenderFormat::Text).render(&report).unwrap();
        assert!(text.contains("abc123"));
    }
}
