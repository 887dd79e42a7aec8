//! Recording a branch's commits on a task.

use std::collections::HashSet;
use std::fmt;

use tracing::info;

use crate::config::Credentials;
use crate::error::{GitSyncError, Result};
use crate::github::{CommitOps, GitHubCommit};
use crate::integration::{GitIntegration, PAGE_SIZE, now, on_status, repository_coordinates};
use crate::model::{CommitLogEntry, TaskId};
use crate::store::RecordStore;

/// Outcome of a commit sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitsFetched {
    pub task_id: TaskId,
    pub branch: String,
    pub new_commits: usize,
}

impl fmt::Display for CommitsFetched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} new commits fetched successfully!", self.new_commits)
    }
}

pub trait CommitSynchronizer {
    /// Record the commits reachable from the task's branch.
    ///
    /// The task's dev branch is used when set, else the project's default
    /// branch. Only the 100 most recent commits are read. Hashes already
    /// recorded on the task are skipped.
    fn fetch_commits(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
    ) -> Result<CommitsFetched>;
}

impl<S: RecordStore> CommitSynchronizer for GitIntegration<S> {
    fn fetch_commits(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
    ) -> Result<CommitsFetched> {
        let mut task = self.store.task(task_id)?;
        let project = self.linked_project(&task)?;
        let client = self.client(credentials)?;

        let branch = task
            .dev_branch()
            .or_else(|| project.configured_default_branch())
            .map(str::to_string)
            .ok_or_else(|| GitSyncError::config("No branch specified to fetch commits from."))?;

        let (owner, repo) = repository_coordinates(&project)?;
        let commits = client
            .list_commits(owner, repo, &branch, PAGE_SIZE)
            .map_err(|e| {
                on_status(e, 404, || {
                    GitSyncError::NotFound(format!("Branch '{}' not found on GitHub.", branch))
                })
            })?;

        let mut known: HashSet<String> = self
            .store
            .commits(task_id)?
            .into_iter()
            .map(|entry| entry.hash)
            .collect();
        let new_entries: Vec<CommitLogEntry> = commits
            .into_iter()
            .filter(|commit| known.insert(commit.sha.clone()))
            .map(|commit| commit_entry(task_id, &branch, commit))
            .collect();
        let new_commits = new_entries.len();

        task.branch.last_synced_on = Some(now());
        self.store.record_commit_sync(&task, new_entries)?;

        info!(task_id, %branch, new_commits, "synchronized commits");
        Ok(CommitsFetched {
            task_id,
            branch,
            new_commits,
        })
    }
}

fn commit_entry(task_id: TaskId, branch: &str, commit: GitHubCommit) -> CommitLogEntry {
    let (author_name, authored_date) = match commit.commit.author {
        Some(author) => (author.name, author.date.map(|date| date.naive_utc())),
        None => (None, None),
    };

    CommitLogEntry {
        task_id,
        hash: commit.sha,
        message: commit.commit.message,
        author_name,
        authored_date,
        url: commit.html_url,
        branch_name: branch.to_string(),
    }
}
