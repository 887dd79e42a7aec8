//! GitHub repository and user operations.

use crate::error::Result;
use crate::github::GitHubClient;
use crate::github::client::encode_path;
use serde::{Deserialize, Serialize};

/// Repository information from GitHub API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    pub owner: GitHubUser,
    pub default_branch: Option<String>,
}

/// Account information from GitHub API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// Request body for creating a repository for the authenticated user.
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

impl NewRepository {
    /// A public, auto-initialized repository.
    pub fn public(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            private: false,
            auto_init: true,
        }
    }
}

/// Repository and account operations.
pub trait RepoOps {
    /// Create a repository owned by the authenticated user.
    fn create_user_repo(&self, repo: &NewRepository) -> Result<GitHubRepo>;

    /// Get a specific repository.
    fn get_repo(&self, owner: &str, name: &str) -> Result<GitHubRepo>;

    /// Get the account the token belongs to.
    fn authenticated_user(&self) -> Result<GitHubUser>;
}

impl RepoOps for GitHubClient {
    fn create_user_repo(&self, repo: &NewRepository) -> Result<GitHubRepo> {
        let response = self.post("/user/repos", repo)?;
        Self::expect(response, 201, "create repository")
    }

    fn get_repo(&self, owner: &str, name: &str) -> Result<GitHubRepo> {
        let endpoint = format!("/repos/{}/{}", encode_path(owner), encode_path(name));
        let response = self.get(&endpoint, &[])?;
        Self::expect(response, 200, "repository")
    }

    fn authenticated_user(&self) -> Result<GitHubUser> {
        let response = self.get("/user", &[])?;
        Self::expect(response, 200, "user")
    }
}
