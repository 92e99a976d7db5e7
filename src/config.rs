//! Configuration module for tfreport.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`tfreport.yaml`)
//! - Environment variables (GitHub Actions `INPUT_*` inputs and
//!   `GITHUB_TOKEN`)
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # tfreport.yaml
//!
//! # Scanning options
//! scan:
//!   # Directory names never descended into
//!   skip_dirs:
//!     - ".git"
//!     - ".github"
//!     - "node_modules"
//!     - ".terraform"
//!   # Regex applied to candidate file paths
//!   included_file_types: '\.tf$'
//!   excluded_file_types: ''
//!
//! # GitHub API options
//! github:
//!   token: ${GITHUB_TOKEN}
//!   api_base_url: https://api.github.com
//!   max_pr_pages: 10
//!
//! # Output options
//! output:
//!   report_dir: complexity-assessment
//!   filename_suffix: ''
//!   pretty: true
//! ```

use crate::error::{Result, TfReportError};
use serde::{Deserialize, Serialize};

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Directory names the scanner never descends into.
    pub skip_dirs: Vec<String>,

    /// Regex a file path must match to be included.
    ///
    /// Defaults to the Terraform definition-file extension.
    pub included_file_types: String,

    /// Regex that excludes a file path even when the inclusion matches.
    ///
    /// Empty means "exclude nothing".
    pub excluded_file_types: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_dirs: default_skip_dirs(),
            included_file_types: default_included_file_types(),
            excluded_file_types: String::new(),
        }
    }
}

fn default_skip_dirs() -> Vec<String> {
    [".git", ".github", "node_modules", ".terraform", ".terragrunt-cache"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_included_file_types() -> String {
    r"\.tf$".to_string()
}

/// GitHub API options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubOptions {
    /// GitHub token used for the pull-request list API.
    pub token: Option<String>,

    /// API base URL (overridable for GitHub Enterprise and tests).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Upper bound on closed-PR pages fetched per run (100 PRs per page).
    #[serde(default = "default_max_pr_pages")]
    pub max_pr_pages: usize,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: default_api_base_url(),
            max_pr_pages: default_max_pr_pages(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_max_pr_pages() -> usize {
    10
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory the JSON artifact is written into.
    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    /// Optional suffix appended to the `<sha>` artifact filename.
    pub filename_suffix: String,

    /// Pretty-print the JSON artifact.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            filename_suffix: String::new(),
            pretty: true,
        }
    }
}

fn default_report_dir() -> String {
    "complexity-assessment".to_string()
}

const fn default_true() -> bool {
    true
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Scanning options.
    pub scan: ScanOptions,

    /// GitHub API options.
    pub github: GitHubOptions,

    /// Output options.
    pub output: OutputOptions,
}

impl Config {
    /// Parse configuration from YAML content.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            TfReportError::config_parse(
                format!("invalid YAML configuration: {e}"),
                Some(Box::new(e)),
                file!(),
                line!(),
            )
        })
    }

    /// Generate an example YAML configuration file.
    #[must_use]
    pub fn example_yaml() -> String {
        let config = Self::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# failed to render example configuration".to_string())
    }

    /// Load the GitHub token from the environment when not configured.
    ///
    /// Priority order:
    /// 1. Existing config value
    /// 2. `INPUT_GITHUB_TOKEN` (GitHub Actions input plumbing)
    /// 3. `GITHUB_TOKEN`
    pub fn load_token_from_env(&mut self) {
        if self.github.token.is_some() {
            return;
        }

        let get_non_empty_env = |var: &str| -> Option<String> {
            std::env::var(var).ok().filter(|s| !s.is_empty())
        };

        for var in ["INPUT_GITHUB_TOKEN", "GITHUB_TOKEN"] {
            if let Some(token) = get_non_empty_env(var) {
                tracing::debug!(env_var = %var, "Loaded GitHub token from environment");
                self.github.token = Some(token);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.included_file_types, r"\.tf$");
        assert!(config.scan.excluded_file_types.is_empty());
        assert!(config.scan.skip_dirs.contains(&".git".to_string()));
        assert_eq!(config.output.report_dir, "complexity-assessment");
        assert!(config.output.pretty);
        assert_eq!(config.github.max_pr_pages, 10);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r"
scan:
  included_file_types: '\.tf$|\.tf\.json$'
  excluded_file_types: 'modules/legacy'
github:
  api_base_url: https://github.example.com/api/v3
output:
  report_dir: reports
  pretty: false
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.scan.included_file_types, r"\.tf$|\.tf\.json$");
        assert_eq!(config.scan.excluded_file_types, "modules/legacy");
        assert_eq!(config.github.api_base_url, "https://github.example.com/api/v3");
        assert_eq!(config.output.report_dir, "reports");
        assert!(!config.output.pretty);
        // Unspecified sections fall back to defaults
        assert_eq!(config.github.max_pr_pages, 10);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let result = Config::from_yaml("scan: [not, a, map]");
        assert!(result.is_err());
    }

    #[test]
    fn test_example_yaml_round_trips() {
        let yaml = Config::example_yaml();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.output.report_dir, "complexity-assessment");
    }
}
