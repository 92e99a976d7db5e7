//! Run provenance resolution.
//!
//! A push event on this CI platform is always the result of a merged pull
//! request, but the event itself carries no direct link to it, only the
//! resulting commit SHAs. The resolver reconstructs the link by scanning
//! merged closed pull requests for a matching merge-commit SHA. When no
//! commit matches (or the event is not a push), provenance falls back to
//! the event's embedded pull-request payload and the triggering actor.

use crate::error::Result;
use crate::event::TriggerEvent;
use crate::github::PullRequestLookup;
use crate::report::{Provenance, RunContext};

/// Resolves a trigger event into a normalized provenance record.
pub struct ProvenanceResolver<'a> {
    lookup: &'a dyn PullRequestLookup,
}

impl<'a> ProvenanceResolver<'a> {
    /// Create a resolver over the given pull-request lookup.
    #[must_use]
    pub fn new(lookup: &'a dyn PullRequestLookup) -> Self {
        Self { lookup }
    }

    /// Resolve provenance for the run.
    ///
    /// Tries the push path first; when it finds nothing (not an error), the
    /// pull-request path supplies the defaults.
    ///
    /// # Errors
    ///
    /// Returns `GitHubApi` if the pull-request list call fails; transport
    /// failures abort the run.
    pub async fn resolve(&self, event: &TriggerEvent, context: &RunContext) -> Result<Provenance> {
        if let Some(provenance) = self.resolve_push(event, &context.repository).await? {
            return Ok(provenance);
        }

        // Pull-request path: the payload may be absent (e.g. manual
        // dispatch), leaving the head branch undefined.
        Ok(Provenance {
            head: event.pull_request.as_ref().map(|pr| pr.head.name.clone()),
            actor: context.actor.clone(),
            actor_name: None,
        })
    }

    /// Push path: match event commits against merged pull requests.
    ///
    /// Issues exactly one list call, and only when commits are present.
    /// Returns `Ok(None)` when no commit matches any merged pull request.
    async fn resolve_push(
        &self,
        event: &TriggerEvent,
        repository: &str,
    ) -> Result<Option<Provenance>> {
        if !event.has_commits() {
            return Ok(None);
        }
        let commits = event.commits.as_deref().unwrap_or_default();

        let prs = self.lookup.list_merged_pull_requests(repository).await?;

        for commit in commits {
            let found = prs
                .iter()
                .find(|pr| pr.merge_commit_sha.as_deref() == Some(commit.id.as_str()));
            if let Some(pr) = found {
                tracing::debug!(
                    commit = %commit.id,
                    pr = pr.number,
                    head = %pr.head.name,
                    "Matched push commit to merged pull request"
                );
                return Ok(Some(Provenance {
                    head: Some(pr.head.name.clone()),
                    actor: commit.author.username.clone().unwrap_or_default(),
                    actor_name: commit.author.name.clone(),
                }));
            }
        }

        tracing::info!("Found no pull requests related to the commits in the push event");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{ClosedPullRequest, PullRequestHead};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory lookup that records how many list calls were made.
    struct FakeLookup {
        prs: Vec<ClosedPullRequest>,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(prs: Vec<ClosedPullRequest>) -> Self {
            Self {
                prs,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PullRequestLookup for FakeLookup {
        async fn list_merged_pull_requests(
            &self,
            _repository: &str,
        ) -> Result<Vec<ClosedPullRequest>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.prs.clone())
        }
    }

    fn merged_pr(number: u64, merge_sha: &str, head: &str) -> ClosedPullRequest {
        ClosedPullRequest {
            number,
            merge_commit_sha: Some(merge_sha.to_string()),
            merged_at: Some("2026-08-30T12:00:00Z".to_string()),
            head: PullRequestHead {
                name: head.to_string(),
            },
        }
    }

    fn push_event(commit_ids: &[&str]) -> TriggerEvent {
        let commits: Vec<serde_json::Value> = commit_ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "author": {"username": "alice", "name": "Alice A"}
                })
            })
            .collect();
        TriggerEvent::from_json(&serde_json::json!({ "commits": commits }).to_string()).unwrap()
    }

    fn test_context() -> RunContext {
        RunContext {
            sha: "abc123".to_string(),
            git_ref: "refs/heads/main".to_string(),
            repository: "octo/infra".to_string(),
            actor: "runner-bot".to_string(),
        }
    }

    #[tokio::test]
    async fn test_push_path_matches_merge_commit() {
        let lookup = FakeLookup::new(vec![
            merged_pr(1, "zzz999", "feature/other"),
            merged_pr(2, "abc123", "feature/x"),
        ]);
        let resolver = ProvenanceResolver::new(&lookup);

        let provenance = resolver
            .resolve(&push_event(&["abc123"]), &test_context())
            .await
            .unwrap();

        assert_eq!(provenance.head.as_deref(), Some("feature/x"));
        assert_eq!(provenance.actor, "alice");
        assert_eq!(provenance.actor_name.as_deref(), Some("Alice A"));
    }

    #[tokio::test]
    async fn test_push_path_first_matching_commit_wins() {
        let lookup = FakeLookup::new(vec![
            merged_pr(1, "first1", "feature/first"),
            merged_pr(2, "second2", "feature/second"),
        ]);
        let resolver = ProvenanceResolver::new(&lookup);

        let provenance = resolver
            .resolve(&push_event(&["nomatch", "first1", "second2"]), &test_context())
            .await
            .unwrap();

        assert_eq!(provenance.head.as_deref(), Some("feature/first"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_push_path_falls_back_when_nothing_matches() {
        let lookup = FakeLookup::new(vec![merged_pr(1, "zzz999", "feature/other")]);
        let resolver = ProvenanceResolver::new(&lookup);

        let provenance = resolver
            .resolve(&push_event(&["abc123"]), &test_context())
            .await
            .unwrap();

        // Not-found is not an error; PR-path defaults apply.
        assert_eq!(provenance.head, None);
        assert_eq!(provenance.actor, "runner-bot");
        assert_eq!(provenance.actor_name, None);
    }

    #[tokio::test]
    async fn test_pull_request_path_skips_network() {
        let lookup = FakeLookup::new(vec![merged_pr(1, "abc123", "feature/x")]);
        let resolver = ProvenanceResolver::new(&lookup);

        let event = TriggerEvent::from_json(
            r#"{"pull_request": {"head": {"ref": "feature/pr-path"}}}"#,
        )
        .unwrap();
        let provenance = resolver.resolve(&event, &test_context()).await.unwrap();

        assert_eq!(provenance.head.as_deref(), Some("feature/pr-path"));
        assert_eq!(provenance.actor, "runner-bot");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bare_event_leaves_head_undefined() {
        let lookup = FakeLookup::new(Vec::new());
        let resolver = ProvenanceResolver::new(&lookup);

        let provenance = resolver
            .resolve(&TriggerEvent::default(), &test_context())
            .await
            .unwrap();

        assert_eq!(provenance.head, None);
        assert_eq!(provenance.actor, "runner-bot");
    }
}
