//! Pull request operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GitSyncError, Result};
use crate::github::GitHubClient;
use crate::github::client::encode_path;

/// A pull request on GitHub.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub head: PullRequestRef,
    pub base: PullRequestRef,
    pub created_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// A reference (branch) in a pull request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// Which pull requests to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
    All,
}

impl PullRequestState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

impl CreatePullRequest {
    /// Create a new pull request.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        head: impl Into<String>,
        base: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            head: head.into(),
            base: base.into(),
        }
    }
}

/// Pull request operations.
pub trait PullRequestOps {
    /// Create a new pull request.
    fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest>;

    /// List pull requests whose head matches `head` (single page).
    fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        state: PullRequestState,
        per_page: u8,
    ) -> Result<Vec<PullRequest>>;
}

impl PullRequestOps for GitHubClient {
    fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest> {
        let endpoint = format!("/repos/{}/{}/pulls", encode_path(owner), encode_path(repo));
        let response = self.post(&endpoint, pr)?;

        if response.status != 201 {
            // Validation failures explain themselves in an `errors` array.
            return Err(GitSyncError::Upstream {
                status: response.status,
                message: response.detailed_error_message(),
            });
        }
        response.json("create pull request")
    }

    fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        state: PullRequestState,
        per_page: u8,
    ) -> Result<Vec<PullRequest>> {
        let endpoint = format!("/repos/{}/{}/pulls", encode_path(owner), encode_path(repo));
        let query = [
            ("head", head.to_string()),
            ("state", state.as_str().to_string()),
            ("per_page", per_page.to_string()),
        ];
        let response = self.get(&endpoint, &query)?;
        Self::expect(response, 200, "pull request list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_merged_pull_request() {
        let pr: PullRequest = serde_json::from_str(
            r#"{"number":5,"title":"Fix","html_url":"https://github.com/o/r/pull/5",
                "state":"closed","head":{"ref":"fix-login-bug","sha":"a"},
                "base":{"ref":"main","sha":"b"},
                "created_at":"2024-01-02T03:04:05Z","merged_at":"2024-01-03T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(pr.head.ref_name, "fix-login-bug");
        assert!(pr.merged_at.is_some());
    }

    #[test]
    fn test_create_pull_request_body_shape() {
        let body = serde_json::to_value(CreatePullRequest::new("T", "B", "dev", "main")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"title": "T", "body": "B", "head": "dev", "base": "main"})
        );
    }
}
