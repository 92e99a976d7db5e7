//! Markdown report renderer for the CI step summary.

use crate::error::Result;
use crate::report::{FileResult, Report};
use crate::reporter::ReportRenderer;
use std::fmt::Write;

/// Renders a report as markdown tables, mirroring the step-summary layout:
/// a provenance header table, the aggregate table, then one table per file.
#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new markdown renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "# Summary\n").map_err(fmt_err)?;
        writeln!(out, "| Actor | SHA | Branch |").map_err(fmt_err)?;
        writeln!(out, "| --- | --- | --- |").map_err(fmt_err)?;
        writeln!(
            out,
            "| {} | {} | {} |",
            report.provenance.actor,
            report.sha,
            report.provenance.head.as_deref().unwrap_or("-"),
        )
        .map_err(fmt_err)?;

        writeln!(out).map_err(fmt_err)?;
        writeln!(out, "| Managed Resources | Data Resources | Module Calls |").map_err(fmt_err)?;
        writeln!(out, "| --- | --- | --- |").map_err(fmt_err)?;
        writeln!(
            out,
            "| {} | {} | {} |",
            report.summary.managed_resources,
            report.summary.data_resources,
            report.summary.module_calls,
        )
        .map_err(fmt_err)?;

        writeln!(out, "\n## Complexity Report").map_err(fmt_err)?;
        for file in &report.files {
            writeln!(out, "\n### File: {}\n", file.file().display()).map_err(fmt_err)?;
            match file {
                FileResult::Success { report: metrics, .. } => {
                    writeln!(out, "| Managed Resources | Data Resources | Module Calls |")
                        .map_err(fmt_err)?;
                    writeln!(out, "| --- | --- | --- |").map_err(fmt_err)?;
                    writeln!(
                        out,
                        "| {} | {} | {} |",
                        metrics.managed_resources, metrics.data_resources, metrics.module_calls,
                    )
                    .map_err(fmt_err)?;
                }
                FileResult::Failure { error, .. } => {
                    writeln!(out, "> :warning: {error}").map_err(fmt_err)?;
                }
            }
        }

        Ok(out)
    }
}

fn fmt_err(e: std::fmt::Error) -> crate::error::TfReportError {
    crate::err!(ReportGeneration {
        message: format!("failed to render markdown: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FileMetrics, Provenance, Report, RunContext};
    use std::path::PathBuf;

    fn sample_report() -> Report {
        Report::assemble(
            &RunContext {
                sha: "abc123".to_string(),
                git_ref: "refs/heads/main".to_string(),
                repository: "octo/infra".to_string(),
                actor: "alice".to_string(),
            },
            vec![
                FileResult::Success {
                    file: PathBuf::from("terraform/main.tf"),
                    report: FileMetrics {
                        managed_resources: 2,
                        data_resources: 1,
                        module_calls: 0,
                    },
                },
                FileResult::Failure {
                    file: PathBuf::from("terraform/broken.tf"),
                    error: "failed to generate report for file, possible syntactical issue"
                        .to_string(),
                },
            ],
            Provenance {
                head: Some("feature/x".to_string()),
                actor: "alice".to_string(),
                actor_name: Some("Alice A".to_string()),
            },
        )
    }

    #[test]
    fn test_render_contains_provenance_row() {
        let rendered = MarkdownRenderer::new().render(&sample_report()).unwrap();
        assert!(rendered.contains("| alice | abc123 | feature/x |"));
    }

    #[test]
    fn test_render_contains_aggregate_row() {
        let rendered = MarkdownRenderer::new().render(&sample_report()).unwrap();
        assert!(rendered.contains("| 2 | 1 | 0 |"));
    }

    #[test]
    fn test_render_lists_every_file() {
        let rendered = MarkdownRenderer::new().render(&sample_report()).unwrap();
        assert!(rendered.contains("### File: terraform/main.tf"));
        assert!(rendered.contains("### File: terraform/broken.tf"));
        assert!(rendered.contains("possible syntactical issue"));
    }

    #[test]
    fn test_missing_head_renders_placeholder() {
        let mut report = sample_report();
        report.provenance.head = None;
        let rendered = MarkdownRenderer::new().render(&report).unwrap();
        assert!(rendered.contains("| alice | abc123 | - |"));
    }
}
