//! Per-file complexity metrics.
//!
//! Parses one Terraform file with `hcl-rs` and reduces its top-level
//! declaration blocks into named counts: managed resources, data resources,
//! and module calls. Only top-level block categories are counted; nested
//! blocks, expressions, and interpolation are out of scope.

use crate::error::{Result, TfReportError};
use crate::report::FileMetrics;
use hcl::Body;
use std::collections::HashSet;
use std::path::Path;

/// Single-file metrics calculator. Stateless; one invocation per file.
#[derive(Debug, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Create a new calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Read and analyze one file.
    ///
    /// # Errors
    ///
    /// Returns `HclParse` if the content is not valid UTF-8 text or is not
    /// valid HCL, and `Io` if the file cannot be read. Callers are expected
    /// to catch these per file and record a failure entry rather than abort
    /// the run.
    pub async fn calculate(&self, path: &Path) -> Result<FileMetrics> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                TfReportError::hcl_parse(
                    path.to_path_buf(),
                    "file is not valid UTF-8 text".to_string(),
                    file!(),
                    line!(),
                )
            } else {
                TfReportError::io(path, e, file!(), line!())
            }
        })?;

        Self::calculate_content(&content, path)
    }

    /// Analyze already-loaded file content.
    ///
    /// # Errors
    ///
    /// Returns `HclParse` if the content is not valid HCL.
    pub fn calculate_content(content: &str, path: &Path) -> Result<FileMetrics> {
        let body: Body = hcl::from_str(content).map_err(|e| {
            crate::err!(HclParse {
                file: path.to_path_buf(),
                message: e.to_string(),
            })
        })?;

        // Distinct identifiers per category; re-declaring the same labels
        // counts once, matching "number of distinct identifiers declared".
        let mut managed: HashSet<String> = HashSet::new();
        let mut data: HashSet<String> = HashSet::new();
        let mut modules: HashSet<String> = HashSet::new();

        for structure in body.into_inner() {
            if let hcl::Structure::Block(block) = structure {
                match block.identifier.as_str() {
                    "resource" => {
                        managed.insert(block_identifier(&block));
                    }
                    "data" => {
                        data.insert(block_identifier(&block));
                    }
                    "module" => {
                        modules.insert(block_identifier(&block));
                    }
                    _ => {
                        // Other block types (variable, output, provider,
                        // terraform, locals) do not contribute to the counts.
                    }
                }
            }
        }

        Ok(FileMetrics {
            managed_resources: managed.len() as u64,
            data_resources: data.len() as u64,
            module_calls: modules.len() as u64,
        })
    }
}

/// Join a block's labels into the declared identifier, e.g.
/// `resource "aws_instance" "web"` becomes `aws_instance.web`.
fn block_identifier(block: &hcl::Block) -> String {
    block
        .labels
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(".")
}
