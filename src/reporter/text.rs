//! Plain text report renderer for terminal output.

use crate::error::Result;
use crate::report::{FileResult, Report};
use crate::reporter::ReportRenderer;
use comfy_table::{Cell, ContentArrangement, Table};

/// Text renderer producing comfy-table output for local runs.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Create a new text renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn metrics_header() -> Vec<Cell> {
        vec![
            Cell::new("File"),
            Cell::new("Managed Resources"),
            Cell::new("Data Resources"),
            Cell::new("Module Calls"),
        ]
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "\ntfreport v{} ({})\n{}\n",
            env!("CARGO_PKG_VERSION"),
            report.date_utc,
            "=".repeat(72),
        ));

        output.push_str(&format!(
            "\nRepository: {}\nRef: {}\nSHA: {}\nActor: {}\nBranch: {}\n",
            report.repository,
            report.git_ref,
            report.sha,
            report.provenance.actor,
            report.provenance.head.as_deref().unwrap_or("-"),
        ));

        let mut table = Table::new();
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(Self::metrics_header());

        for file in &report.files {
            match file {
                FileResult::Success { file, report: metrics } => {
                    table.add_row(vec![
                        Cell::new(file.display()),
                        Cell::new(metrics.managed_resources),
                        Cell::new(metrics.data_resources),
                        Cell::new(metrics.module_calls),
                    ]);
                }
                FileResult::Failure { file, error } => {
                    table.add_row(vec![
                        Cell::new(file.display()),
                        Cell::new(error.as_str()),
                        Cell::new("-"),
                        Cell::new("-"),
                    ]);
                }
            }
        }

        table.add_row(vec![
            Cell::new("TOTAL"),
            Cell::new(report.summary.managed_resources),
            Cell::new(report.summary.data_resources),
            Cell::new(report.summary.module_calls),
        ]);

        output.push('\n');
        output.push_str(&table.to_string());
        output.push('\n');

        let failures = report.files.iter().filter(|f| f.is_failure()).count();
        output.push_str(&format!(
            "\n{} files | {} failed\n",
            report.files.len(),
            failures
        ));

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FileMetrics, Provenance, RunContext};
    use std::path::PathBuf;

    #[test]
    fn test_render_includes_totals_and_failures() {
        let report = Report::assemble(
            &RunContext {
                sha: "abc123".to_string(),
                git_ref: "refs/heads/main".to_string(),
                repository: "octo/infra".to_string(),
                actor: "alice".to_string(),
            },
            vec![
                FileResult::Success {
                    file: PathBuf::from("main.tf"),
                    report: FileMetrics {
                        managed_resources: 4,
                        data_resources: 2,
                        module_calls: 1,
                    },
                },
                FileResult::Failure {
                    file: PathBuf::from("bad.tf"),
                    error: "failed to generate report for file, possible syntactical issue"
                        .to_string(),
                },
            ],
            Provenance::default(),
        );

        let rendered = TextRenderer::new().render(&report).unwrap();
        assert!(rendered.contains("TOTAL"));
        assert!(rendered.contains("main.tf"));
        assert!(rendered.contains("bad.tf"));
        assert!(rendered.contains("2 files | 1 failed"));
    }
}
