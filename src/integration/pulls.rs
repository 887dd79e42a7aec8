//! Recording and opening pull requests for a task.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use crate::config::Credentials;
use crate::error::{GitSyncError, Result};
use crate::github::{CreatePullRequest, PullRequest, PullRequestOps, PullRequestState};
use crate::integration::{GitIntegration, PAGE_SIZE, repository_coordinates};
use crate::model::{Project, PullRequestEntry, PullRequestStatus, Task, TaskId};
use crate::store::RecordStore;

/// Outcome of a pull request sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestsFetched {
    pub task_id: TaskId,
    pub new_pull_requests: usize,
}

impl fmt::Display for PullRequestsFetched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new pull requests fetched successfully!",
            self.new_pull_requests
        )
    }
}

/// A pull request was opened upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOpened {
    pub task_id: TaskId,
    pub number: u64,
    pub url: String,
    /// The follow-up sync; `None` when the task has no dev branch to sync.
    pub synced: Option<PullRequestsFetched>,
}

impl fmt::Display for PullRequestOpened {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pull Request #{} created successfully!", self.number)
    }
}

/// What to open a pull request with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: String,
}

impl PullRequestDraft {
    pub fn new(
        source_branch: impl Into<String>,
        target_branch: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    /// Sets the pull request body.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Defaults for merging a task's dev branch into the project's default branch.
    pub fn for_task(project: &Project, task: &Task) -> Self {
        let source = task.dev_branch().unwrap_or_default();
        let target = project.default_branch();
        let shown_source = if source.is_empty() { "..." } else { source };

        Self::new(source, target, format!("Merge {} into {}", shown_source, target))
            .description(format!("Pull Request regarding task: {}", task.name))
    }

    fn validate(&self) -> Result<()> {
        let missing = [
            ("source branch", &self.source_branch),
            ("target branch", &self.target_branch),
            ("title", &self.title),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((field, _)) => Err(GitSyncError::config(format!(
                "A pull request {} is required.",
                field
            ))),
            None => Ok(()),
        }
    }
}

pub trait PullRequestSynchronizer {
    /// Record the pull requests whose head is the task's dev branch.
    ///
    /// Pull requests already recorded on the task are skipped, even when
    /// their upstream state has changed since.
    fn fetch_pull_requests(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
    ) -> Result<PullRequestsFetched>;

    /// Open a pull request, then sync the task's pull requests.
    fn create_pull_request(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
        draft: &PullRequestDraft,
    ) -> Result<PullRequestOpened>;
}

impl<S: RecordStore> PullRequestSynchronizer for GitIntegration<S> {
    fn fetch_pull_requests(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
    ) -> Result<PullRequestsFetched> {
        let task = self.store.task(task_id)?;
        let project = self.linked_project(&task)?;
        let client = self.client(credentials)?;

        let dev_branch = task.dev_branch().ok_or_else(|| {
            GitSyncError::config("The task has no dev branch. Create a branch first.")
        })?;
        let (owner, repo) = repository_coordinates(&project)?;

        let qualified = format!("{}:{}", owner, dev_branch);
        let mut pulls =
            client.list_pull_requests(owner, repo, &qualified, PullRequestState::All, PAGE_SIZE)?;
        if pulls.is_empty() {
            debug!(task_id, head = %dev_branch, "no pull requests for qualified head, retrying bare");
            pulls = client.list_pull_requests(
                owner,
                repo,
                dev_branch,
                PullRequestState::All,
                PAGE_SIZE,
            )?;
        }

        let mut known: HashSet<u64> = self
            .store
            .pull_requests(task_id)?
            .into_iter()
            .map(|entry| entry.number)
            .collect();
        let new_entries: Vec<PullRequestEntry> = pulls
            .into_iter()
            .filter(|pr| known.insert(pr.number))
            .map(|pr| pull_request_entry(task_id, pr))
            .collect();
        let new_pull_requests = new_entries.len();

        if !new_entries.is_empty() {
            self.store.insert_pull_requests(new_entries)?;
        }

        info!(task_id, head = %dev_branch, new_pull_requests, "synchronized pull requests");
        Ok(PullRequestsFetched {
            task_id,
            new_pull_requests,
        })
    }

    fn create_pull_request(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
        draft: &PullRequestDraft,
    ) -> Result<PullRequestOpened> {
        let task = self.store.task(task_id)?;
        let project = self.linked_project(&task)?;
        let client = self.client(credentials)?;
        draft.validate()?;

        let (owner, repo) = repository_coordinates(&project)?;
        let request = CreatePullRequest::new(
            &draft.title,
            &draft.description,
            &draft.source_branch,
            &draft.target_branch,
        );
        let created = client.create_pull_request(owner, repo, &request)?;
        info!(task_id, number = created.number, "opened pull request");

        let synced = match task.dev_branch() {
            Some(_) => Some(self.fetch_pull_requests(credentials, task_id)?),
            None => None,
        };

        Ok(PullRequestOpened {
            task_id,
            number: created.number,
            url: created.html_url,
            synced,
        })
    }
}

fn pull_request_entry(task_id: TaskId, pr: PullRequest) -> PullRequestEntry {
    PullRequestEntry {
        task_id,
        number: pr.number,
        title: pr.title,
        url: pr.html_url,
        status: PullRequestStatus::from_upstream(&pr.state, pr.merged_at.is_some()),
        source_branch: pr.head.ref_name,
        target_branch: pr.base.ref_name,
        created_on: pr.created_at.map(|date| date.naive_utc()),
        merged_on: pr.merged_at.map(|date| date.naive_utc()),
        created_by: None,
    }
}
