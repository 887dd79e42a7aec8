//! Commit listing.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::github::GitHubClient;
use crate::github::client::encode_path;

/// A commit from the list-commits endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: Option<CommitSignature>,
}

/// Git author/committer signature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitSignature {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

pub trait CommitOps {
    /// List up to `per_page` commits reachable from `sha` (single page).
    fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        per_page: u8,
    ) -> Result<Vec<GitHubCommit>>;
}

impl CommitOps for GitHubClient {
    fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        per_page: u8,
    ) -> Result<Vec<GitHubCommit>> {
        let endpoint = format!(
            "/repos/{}/{}/commits",
            encode_path(owner),
            encode_path(repo)
        );
        let query = [("sha", sha.to_string()), ("per_page", per_page.to_string())];
        let response = self.get(&endpoint, &query)?;
        Self::expect(response, 200, "commit list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_commit_without_author() {
        let commit: GitHubCommit = serde_json::from_str(
            r#"{"sha":"abc","html_url":"https://github.com/o/r/commit/abc",
                "commit":{"message":"init","author":null}}"#,
        )
        .unwrap();
        assert_eq!(commit.sha, "abc");
        assert!(commit.commit.author.is_none());
    }

    #[test]
    fn test_decode_commit_date() {
        let commit: GitHubCommit = serde_json::from_str(
            r#"{"sha":"abc","html_url":"u",
                "commit":{"message":"m","author":{"name":"Ada","date":"2024-03-01T12:30:00+02:00"}}}"#,
        )
        .unwrap();
        let date = commit.commit.author.unwrap().date.unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }
}
