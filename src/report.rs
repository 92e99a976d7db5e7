//! Report data model.
//!
//! Defines the canonical, versioned schema of the persisted JSON artifact:
//! per-file metrics, the per-file success/failure union, the aggregate
//! summary, run provenance, and the top-level [`Report`] record.
//!
//! Historical variants of this report drifted in field naming and summary
//! nesting; this module is the single source of truth and the schema is
//! versioned explicitly via [`Report::SCHEMA_VERSION`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complexity counts derived from one parsed Terraform file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Number of distinct `resource` declarations.
    pub managed_resources: u64,
    /// Number of distinct `data` declarations.
    pub data_resources: u64,
    /// Number of distinct `module` invocations.
    pub module_calls: u64,
}

/// Outcome of analyzing one scanned file: metrics or an error description,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileResult {
    /// The file parsed and produced metrics.
    Success {
        /// Path of the analyzed file, relative to the scan root's parent.
        file: PathBuf,
        /// Derived complexity counts.
        report: FileMetrics,
    },
    /// The file could not be parsed.
    Failure {
        /// Path of the analyzed file.
        file: PathBuf,
        /// Fixed diagnostic message; raw parser detail is intentionally
        /// discarded so the artifact stays stable across parser versions.
        error: String,
    },
}

impl FileResult {
    /// The path this result refers to.
    #[must_use]
    pub fn file(&self) -> &PathBuf {
        match self {
            Self::Success { file, .. } | Self::Failure { file, .. } => file,
        }
    }

    /// Metrics for successful results.
    #[must_use]
    pub const fn metrics(&self) -> Option<&FileMetrics> {
        match self {
            Self::Success { report, .. } => Some(report),
            Self::Failure { .. } => None,
        }
    }

    /// Whether this result is a failure entry.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Element-wise sum of [`FileMetrics`] over successful file results only.
///
/// Failed files contribute nothing to any field; they are excluded from the
/// sum rather than counted as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Total managed resource declarations across successful files.
    pub managed_resources: u64,
    /// Total data resource declarations across successful files.
    pub data_resources: u64,
    /// Total module invocations across successful files.
    pub module_calls: u64,
}

impl AggregateSummary {
    /// Sum metrics over the successful subset of `results`.
    #[must_use]
    pub fn from_results(results: &[FileResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            if let Some(metrics) = result.metrics() {
                summary.managed_resources += metrics.managed_resources;
                summary.data_resources += metrics.data_resources;
                summary.module_calls += metrics.module_calls;
            }
        }
        summary
    }
}

/// Normalized `{head branch, actor}` record for the run, resolved once.
///
/// Sourced from a matched merged pull request on push events, or from the
/// pull-request payload attached to the triggering event otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Head branch name; absent when the event carries no pull request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Actor login.
    pub actor: String,
    /// Actor display name, when the commit author carried one.
    #[serde(rename = "actorName", skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
}

/// Metadata identifying the CI run, taken from the runner environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Commit SHA the run was triggered for.
    pub sha: String,
    /// Fully qualified git ref (e.g. `refs/heads/main`).
    pub git_ref: String,
    /// `owner/repo` identifier.
    pub repository: String,
    /// Login of the actor that triggered the run.
    pub actor: String,
}

impl RunContext {
    /// Build a run context from the standard GitHub Actions environment
    /// variables. Missing variables become empty strings; the report schema
    /// tolerates that for local runs.
    #[must_use]
    pub fn from_env() -> Self {
        let env = |var: &str| std::env::var(var).unwrap_or_default();
        Self {
            sha: env("GITHUB_SHA"),
            git_ref: env("GITHUB_REF"),
            repository: env("GITHUB_REPOSITORY"),
            actor: env("GITHUB_ACTOR"),
        }
    }
}

/// The top-level persisted record: one per run, written exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Canonical schema version of this record.
    pub schema_version: u32,
    /// Commit SHA of the run.
    pub sha: String,
    /// Git ref of the run.
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// `owner/repo` identifier.
    pub repository: String,
    /// Per-file results, in scanner discovery order.
    pub files: Vec<FileResult>,
    /// Aggregate counts over successful files.
    pub summary: AggregateSummary,
    /// ISO-8601 UTC timestamp of report assembly.
    #[serde(rename = "dateUtc")]
    pub date_utc: String,
    /// Resolved run provenance.
    pub provenance: Provenance,
}

impl Report {
    /// Current schema version.
    pub const SCHEMA_VERSION: u32 = 1;

    /// Assemble a report from its parts, stamping the current UTC time.
    #[must_use]
    pub fn assemble(context: &RunContext, files: Vec<FileResult>, provenance: Provenance) -> Self {
        let summary = AggregateSummary::from_results(&files);
        Self {
            schema_version: Self::SCHEMA_VERSION,
            sha: context.sha.clone(),
            git_ref: context.git_ref.clone(),
            repository: context.repository.clone(),
            files,
            summary,
            date_utc: chrono::Utc::now().to_rfc3339(),
            provenance,
        }
    }
}
