//! Git reference (branch) operations.

use crate::error::{GitSyncError, Result};
use crate::github::GitHubClient;
use crate::github::client::encode_path;
use serde::{Deserialize, Serialize};

/// A git reference from GitHub API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: GitObject,
}

/// The object a reference points at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

/// `git/refs/heads/<name>` answers with a list of prefix matches when there
/// is no exact match.
#[derive(Deserialize)]
#[serde(untagged)]
enum RefLookup {
    Single(GitRef),
    Many(Vec<GitRef>),
}

#[derive(Serialize)]
struct NewRef<'a> {
    #[serde(rename = "ref")]
    ref_name: &'a str,
    sha: &'a str,
}

/// Reference operations.
pub trait RefOps {
    /// Resolve the head reference of a branch.
    fn get_branch_ref(&self, owner: &str, repo: &str, branch: &str) -> Result<GitRef>;

    /// Create `refs/heads/<branch>` pointing at `sha`.
    fn create_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<GitRef>;
}

impl RefOps for GitHubClient {
    fn get_branch_ref(&self, owner: &str, repo: &str, branch: &str) -> Result<GitRef> {
        let endpoint = format!(
            "/repos/{}/{}/git/refs/heads/{}",
            encode_path(owner),
            encode_path(repo),
            encode_path(branch)
        );
        let response = self.get(&endpoint, &[])?;
        let lookup: RefLookup = Self::expect(response, 200, "branch reference")?;

        let wanted = format!("refs/heads/{}", branch);
        let found = match lookup {
            RefLookup::Single(git_ref) => Some(git_ref).filter(|r| r.ref_name == wanted),
            RefLookup::Many(refs) => refs.into_iter().find(|r| r.ref_name == wanted),
        };

        found.ok_or_else(|| GitSyncError::Upstream {
            status: 404,
            message: format!("No exact reference for {}", wanted),
        })
    }

    fn create_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<GitRef> {
        let endpoint = format!(
            "/repos/{}/{}/git/refs",
            encode_path(owner),
            encode_path(repo)
        );
        let ref_name = format!("refs/heads/{}", branch);
        let response = self.post(
            &endpoint,
            &NewRef {
                ref_name: &ref_name,
                sha,
            },
        )?;
        Self::expect(response, 201, "create reference")
    }
}
