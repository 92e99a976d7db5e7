//! CI trigger event model.
//!
//! Serde types for the two event shapes the pipeline understands: push
//! events (carrying an ordered list of commits) and pull-request events
//! (carrying an embedded pull-request payload). Unknown fields are ignored
//! so the types stay tolerant of forge payload growth.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Author attribution on a push-event commit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    /// Forge login of the author.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name of the author.
    #[serde(default)]
    pub name: Option<String>,
}

/// One commit entry on a push event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventCommit {
    /// Commit SHA.
    pub id: String,
    /// Commit author attribution.
    #[serde(default)]
    pub author: CommitAuthor,
}

/// Head branch reference of a pull request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestBranch {
    /// Branch name.
    #[serde(rename = "ref")]
    pub name: String,
}

/// Pull-request payload embedded in a pull-request event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPullRequest {
    /// Head branch of the pull request.
    pub head: PullRequestBranch,
}

/// The raw CI trigger payload, in either push or pull-request shape.
///
/// A push event carries `commits`; a pull-request event carries
/// `pull_request`. Both may be absent on other trigger types, in which case
/// provenance falls back to the triggering actor with no head branch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerEvent {
    /// Ordered commits of a push event.
    #[serde(default)]
    pub commits: Option<Vec<EventCommit>>,
    /// Embedded pull-request payload of a pull-request event.
    #[serde(default)]
    pub pull_request: Option<EventPullRequest>,
}

impl TriggerEvent {
    /// Parse an event from inline JSON.
    ///
    /// # Errors
    ///
    /// Returns `EventParse` if the JSON is malformed.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            crate::err!(EventParse {
                message: e.to_string(),
            })
        })
    }

    /// Load an event from a JSON file, as delivered via `GITHUB_EVENT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `EventParse` if its
    /// content is malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::TfReportError::io(path, e, file!(), line!()))?;
        Self::from_json(&content)
    }

    /// Whether the event carries a non-empty push commit list.
    #[must_use]
    pub fn has_commits(&self) -> bool {
        self.commits.as_ref().is_some_and(|c| !c.is_empty())
    }
}
