//! GitHub pull-request API client.
//!
//! Provides the network lookup used by provenance resolution: listing the
//! merged closed pull requests of a repository. The HTTP layer retries
//! transient failures with exponential backoff; anything else surfaces as a
//! fatal `GitHubApi` error.

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Retry/backoff configuration for the HTTP layer.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Initial delay between attempts, in milliseconds.
    pub delay_ms: u64,
    /// Maximum number of retries for 429/5xx responses.
    pub max_retries: usize,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            max_retries: 3,
            backoff_multiplier: 2.0,
        }
    }
}

/// A closed pull request as returned by the list API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosedPullRequest {
    /// Pull request number.
    pub number: u64,
    /// SHA of the merge commit, when the PR was merged.
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    /// Merge timestamp; `None` means closed without merging.
    #[serde(default)]
    pub merged_at: Option<String>,
    /// Head branch of the pull request.
    pub head: PullRequestHead,
}

/// Head branch reference on a pull request API record.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    /// Branch name.
    #[serde(rename = "ref")]
    pub name: String,
}

/// Abstract lookup of merged pull requests, injectable for tests.
#[async_trait]
pub trait PullRequestLookup: Send + Sync {
    /// List the merged closed pull requests of `repository` (`owner/repo`),
    /// newest first per the forge's default ordering.
    async fn list_merged_pull_requests(&self, repository: &str) -> Result<Vec<ClosedPullRequest>>;
}

/// GitHub API client.
pub struct GitHubClient {
    client: Client,
    api_base_url: String,
    token: Option<String>,
    max_pages: usize,
    retry: RetryConfig,
}

impl GitHubClient {
    /// Create a client from configuration.
    ///
    /// The token is required lazily, at the first list call: only push-path
    /// runs ever touch the network, and local runs should not need a
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("tfreport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                crate::err!(Internal {
                    message: format!("failed to create HTTP client: {e}"),
                })
            })?;

        Ok(Self {
            client,
            api_base_url: config.github.api_base_url.trim_end_matches('/').to_string(),
            token: config.github.token.clone(),
            max_pages: config.github.max_pr_pages,
            retry: RetryConfig::default(),
        })
    }

    /// Issue a GET request with retry/backoff on 429 and server errors.
    async fn get_with_retry(&self, url: &str, token: &str) -> Result<reqwest::Response> {
        let mut attempts = 0;
        let mut delay = self.retry.delay_ms;

        loop {
            attempts += 1;
            let response = self
                .client
                .get(url)
                .header("Authorization", format!("token {token}"))
                .header("Accept", "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| {
                    crate::err!(GitHubApi {
                        message: format!("HTTP request failed for {url}: {e}"),
                        status_code: None,
                    })
                })?;

            if response.status().is_success() {
                return Ok(response);
            }

            let status = response.status();
            if (status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS)
                && attempts <= self.retry.max_retries
            {
                tracing::warn!(
                    url = %url,
                    status = %status,
                    attempt = attempts,
                    max = self.retry.max_retries,
                    delay_ms = delay,
                    "Request failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = (delay as f64 * self.retry.backoff_multiplier) as u64;
                continue;
            }

            return Err(crate::err!(GitHubApi {
                message: format!("HTTP request failed for {url}: Status {status}"),
                status_code: Some(status.as_u16()),
            }));
        }
    }
}

#[async_trait]
impl PullRequestLookup for GitHubClient {
    async fn list_merged_pull_requests(&self, repository: &str) -> Result<Vec<ClosedPullRequest>> {
        let token = self.token.as_deref().ok_or_else(|| {
            crate::err!(ConfigMissing {
                key: "github.token - set GITHUB_TOKEN to resolve push provenance".to_string(),
            })
        })?;

        tracing::debug!(repository = %repository, "Listing closed pull requests");
        let mut prs = Vec::new();
        let per_page = 100;

        // The list API has no merge-commit index; page through closed PRs
        // up to the configured bound and keep only the merged ones.
        for page in 1..=self.max_pages {
            let url = format!(
                "{}/repos/{}/pulls?state=closed&page={}&per_page={}",
                self.api_base_url, repository, page, per_page
            );

            let response = self.get_with_retry(&url, token).await?;
            let page_prs: Vec<ClosedPullRequest> = response.json().await.map_err(|e| {
                crate::err!(GitHubApi {
                    message: format!("failed to parse pull request list: {e}"),
                    status_code: None,
                })
            })?;

            let page_len = page_prs.len();
            prs.extend(page_prs.into_iter().filter(|pr| pr.merged_at.is_some()));

            if page_len < per_page {
                break;
            }
        }

        tracing::debug!(repository = %repository, count = prs.len(), "Merged pull requests fetched");
        Ok(prs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base_url: String) -> Config {
        let mut config = Config::default();
        config.github.token = Some("ghp_test".to_string());
        config.github.api_base_url = api_base_url;
        config
    }

    fn pr_json(number: u64, merge_sha: Option<&str>, head: &str) -> serde_json::Value {
        serde_json::json!({
            "number": number,
            "merge_commit_sha": merge_sha,
            "merged_at": merge_sha.map(|_| "2026-08-30T12:00:00Z"),
            "head": {"ref": head, "sha": "ignored"},
            "state": "closed"
        })
    }

    #[tokio::test]
    async fn test_list_filters_unmerged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/infra/pulls"))
            .and(query_param("state", "closed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                pr_json(1, Some("abc123"), "feature/x"),
                pr_json(2, None, "feature/abandoned"),
            ])))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&test_config(server.uri())).unwrap();
        let prs = client.list_merged_pull_requests("octo/infra").await.unwrap();

        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].number, 1);
        assert_eq!(prs[0].merge_commit_sha.as_deref(), Some("abc123"));
        assert_eq!(prs[0].head.name, "feature/x");
    }

    #[tokio::test]
    async fn test_list_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/infra/pulls"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&test_config(server.uri())).unwrap();
        let result = client.list_merged_pull_requests("octo/infra").await;
        assert!(matches!(
            result,
            Err(crate::error::TfReportError::GitHubApi {
                status_code: Some(404),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_retry_on_server_error() {
        let server = MockServer::start().await;
        // First attempt fails, the retry succeeds.
        Mock::given(method("GET"))
            .and(path("/repos/octo/infra/pulls"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/infra/pulls"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([pr_json(9, Some("fff000"), "hotfix")])),
            )
            .mount(&server)
            .await;

        let mut config = test_config(server.uri());
        config.github.max_pr_pages = 1;
        let mut client = GitHubClient::new(&config).unwrap();
        client.retry.delay_ms = 1;

        let prs = client.list_merged_pull_requests("octo/infra").await.unwrap();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].number, 9);
    }

    #[tokio::test]
    async fn test_listing_without_token_is_config_error() {
        let client = GitHubClient::new(&Config::default()).unwrap();
        let result = client.list_merged_pull_requests("octo/infra").await;
        assert!(matches!(
            result,
            Err(crate::error::TfReportError::ConfigMissing { .. })
        ));
    }
}
