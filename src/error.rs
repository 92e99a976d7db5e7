//! Error types for tfreport.
//!
//! This module defines the error hierarchy using `thiserror`. All errors
//! include context and can be propagated with the `?` operator.
//!
//! # Error Categories
//!
//! - **IO errors**: unreadable directories/files, missing scan roots — fatal
//! - **Parse errors**: a single file's HCL could not be interpreted — caught
//!   per file by the pipeline and turned into a failure entry in the report
//! - **GitHub API errors**: transport or status failures while listing pull
//!   requests — fatal
//! - **Event/config errors**: malformed trigger payloads or configuration

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(DirectoryNotFound { path: root.to_path_buf() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::TfReportError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for tfreport operations.
pub type Result<T> = std::result::Result<T, TfReportError>;

/// The main error type for tfreport.
///
/// Covers all failure conditions that can occur during scanning, metric
/// calculation, provenance resolution, and report persistence.
#[derive(Error, Debug)]
pub enum TfReportError {
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Scan root directory not found.
    #[error("Directory not found: {path} ({src_path}:{src_line})")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// HCL parsing error for a single scanned file.
    #[error("Failed to parse HCL in '{file}' ({src_path}:{src_line}): {message}")]
    HclParse {
        /// The file being parsed
        file: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The trigger event payload could not be decoded.
    #[error("Failed to parse trigger event ({src_path}:{src_line}): {message}")]
    EventParse {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid file filter pattern.
    #[error("Invalid file filter pattern '{pattern}' ({src_path}:{src_line}): {message}")]
    FilterPattern {
        /// The offending regex pattern
        pattern: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// GitHub API error while listing pull requests.
    #[error("GitHub API error ({src_path}:{src_line}): {message}")]
    GitHubApi {
        /// Error message
        message: String,
        /// HTTP status code (if available)
        status_code: Option<u16>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Missing required configuration.
    #[error("Missing required configuration: {key} ({src_path}:{src_line})")]
    ConfigMissing {
        /// The missing configuration key
        key: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Report generation or persistence error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl TfReportError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
            src_path,
            src_line,
        }
    }

    /// Creates an `HclParse` error.
    #[must_use]
    pub fn hcl_parse(
        file: PathBuf,
        message: String,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::HclParse {
            file,
            message,
            src_path,
            src_line,
        }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::ConfigParse {
            message,
            source,
            src_path,
            src_line,
        }
    }

    /// Determines if the error is recoverable at the file level.
    ///
    /// Recoverable errors are captured per file and embedded as failure
    /// entries in the report; everything else aborts the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::HclParse { .. })
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::DirectoryNotFound { .. } => 15,
            Self::EventParse { .. } => 16,
            Self::FilterPattern { .. } => 17,
            Self::ConfigParse { .. } => 18,
            Self::ConfigMissing { .. } => 20,
            Self::GitHubApi { .. } => 22,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for TfReportError {
    fn from(source: std::io::Error) -> Self {
        // Used when a PathBuf is not readily available; prefer
        // TfReportError::io(path, source, file!(), line!()) where one is.
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

impl From<serde_json::Error> for TfReportError {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization/deserialization error: {source}"),
            src_path: file!(),
            src_line: line!(),
        }
    }
}
