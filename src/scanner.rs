//! File discovery.
//!
//! Recursively walks a root directory and returns the Terraform definition
//! files to analyze, in directory-listing order. Version-control and
//! dependency-cache directories are never descended into, and candidate
//! files pass through configurable include/exclude regex filters.

use crate::config::Config;
use crate::error::{Result, TfReportError};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursive file scanner with include/exclude filtering.
pub struct Scanner {
    skip_dirs: Vec<glob::Pattern>,
    include: Regex,
    exclude: Option<Regex>,
}

impl Scanner {
    /// Create a scanner from configuration, compiling the filter patterns.
    ///
    /// # Errors
    ///
    /// Returns `FilterPattern` if an include/exclude regex or a skip-dir
    /// glob is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        let include = Regex::new(&config.scan.included_file_types).map_err(|e| {
            crate::err!(FilterPattern {
                pattern: config.scan.included_file_types.clone(),
                message: e.to_string(),
            })
        })?;

        // An empty exclusion means "exclude nothing", not "match everything".
        let exclude = if config.scan.excluded_file_types.is_empty() {
            None
        } else {
            Some(Regex::new(&config.scan.excluded_file_types).map_err(|e| {
                crate::err!(FilterPattern {
                    pattern: config.scan.excluded_file_types.clone(),
                    message: e.to_string(),
                })
            })?)
        };

        let skip_dirs = config
            .scan
            .skip_dirs
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    crate::err!(FilterPattern {
                        pattern: p.clone(),
                        message: e.to_string(),
                    })
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            skip_dirs,
            include,
            exclude,
        })
    }

    /// Walk the tree rooted at `root` and return matching file paths.
    ///
    /// Result order follows the underlying directory listing; it is not
    /// guaranteed to be lexical. This order becomes the order of file
    /// entries in the final report.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryNotFound` or `Io` if `root` does not exist or is
    /// not readable. These are fatal for the whole run.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(crate::err!(DirectoryNotFound {
                path: root.to_path_buf(),
            }));
        }
        // Surface an unreadable root as a fatal error before walking;
        // deeper entry errors are logged and skipped.
        std::fs::read_dir(root).map_err(|e| TfReportError::io(root, e, file!(), line!()))?;

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !self.should_skip_dir(e.path(), e.file_type().is_dir()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            if self.matches(path) {
                tracing::debug!(file = %path.display(), "Discovered file");
                files.push(path.to_path_buf());
            }
        }

        tracing::info!(root = %root.display(), count = files.len(), "Scan complete");
        Ok(files)
    }

    /// Check whether a directory should be pruned from the walk.
    fn should_skip_dir(&self, path: &Path, is_dir: bool) -> bool {
        if !is_dir {
            return false;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.skip_dirs.iter().any(|p| p.matches(name)) {
            tracing::debug!(path = %path.display(), "Skipping directory");
            return true;
        }
        false
    }

    /// Apply include/exclude filters to a candidate file path.
    fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        if !self.include.is_match(&path_str) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(&path_str) {
                return false;
            }
        }
        true
    }
}
