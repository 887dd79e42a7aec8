//! Project, task, commit and pull request records.
//!
//! These are the git-related fields a project-management system keeps on its
//! projects and tasks, plus the two child record kinds fetched from GitHub.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProjectId = u64;
pub type TaskId = u64;

/// Branch used when a project has no default branch configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Whether a project has a linked repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    NotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchStatus {
    #[default]
    Active,
    Merged,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestStatus {
    Open,
    Closed,
    Merged,
}

impl PullRequestStatus {
    /// Local status for an upstream PR. A merge timestamp wins over the raw state.
    pub fn from_upstream(state: &str, merged: bool) -> Self {
        if merged {
            Self::Merged
        } else if state.eq_ignore_ascii_case("open") {
            Self::Open
        } else {
            Self::Closed
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connected => "connected",
            Self::NotConnected => "not_connected",
        })
    }
}

impl fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Merged => "merged",
            Self::Deleted => "deleted",
        })
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
        })
    }
}

/// The user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub login: String,
}

impl UserRef {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

/// Repository link stored on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryLink {
    pub repository_name: Option<String>,
    pub repository_url: Option<String>,
    /// Upstream numeric id, kept as text.
    pub repository_id: Option<String>,
    pub repository_owner: Option<String>,
    pub default_branch: String,
    pub connection_status: ConnectionStatus,
    pub connected_on: Option<NaiveDateTime>,
}

impl Default for RepositoryLink {
    fn default() -> Self {
        Self {
            repository_name: None,
            repository_url: None,
            repository_id: None,
            repository_owner: None,
            default_branch: DEFAULT_BRANCH.to_string(),
            connection_status: ConnectionStatus::NotConnected,
            connected_on: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub repository: RepositoryLink,
}

impl Project {
    /// True once a repository has been linked.
    pub fn is_linked(&self) -> bool {
        self.repository
            .repository_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }

    /// Default branch as configured, if non-blank.
    pub fn configured_default_branch(&self) -> Option<&str> {
        Some(self.repository.default_branch.trim()).filter(|branch| !branch.is_empty())
    }

    /// Default branch, falling back to [`DEFAULT_BRANCH`] when blank.
    pub fn default_branch(&self) -> &str {
        self.configured_default_branch().unwrap_or(DEFAULT_BRANCH)
    }

    /// Web URL of a branch in the linked repository.
    pub fn branch_url(&self, branch: &str) -> Option<String> {
        self.repository
            .repository_url
            .as_deref()
            .map(|url| format!("{url}/tree/{branch}"))
    }
}

/// Branch link stored on a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchLink {
    pub dev_branch: Option<String>,
    pub dev_branch_url: Option<String>,
    /// Currently always equal to the dev branch.
    pub commit_branch: Option<String>,
    pub commit_branch_url: Option<String>,
    pub branch_status: BranchStatus,
    pub branch_created_by: Option<UserRef>,
    pub branch_created_on: Option<NaiveDateTime>,
    pub last_synced_on: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub branch: BranchLink,
}

impl Task {
    /// The task's dev branch, if one is set and non-empty.
    pub fn dev_branch(&self) -> Option<&str> {
        self.branch
            .dev_branch
            .as_deref()
            .filter(|branch| !branch.is_empty())
    }
}

/// A commit fetched from GitHub for a task. Unique per task by `hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitLogEntry {
    pub task_id: TaskId,
    pub hash: String,
    pub message: String,
    pub author_name: Option<String>,
    pub authored_date: Option<NaiveDateTime>,
    pub url: String,
    pub branch_name: String,
}

/// A pull request fetched from GitHub for a task. Unique per task by `number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEntry {
    pub task_id: TaskId,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub status: PullRequestStatus,
    pub source_branch: String,
    pub target_branch: String,
    pub created_on: Option<NaiveDateTime>,
    pub merged_on: Option<NaiveDateTime>,
    pub created_by: Option<UserRef>,
}
