//! Project/task operations against a linked GitHub repository.
//!
//! [`GitIntegration`] owns the record store and the HTTP transport. Each
//! component is a trait implemented for it:
//! - [`RepositoryLinker`] creates or links a project's repository
//! - [`BranchManager`] creates a task branch off the default branch
//! - [`CommitSynchronizer`] records a branch's commits on a task
//! - [`PullRequestSynchronizer`] records and opens pull requests for a task
//!
//! Every entry point takes the [`Credentials`] explicitly and either applies
//! all of its writes or none of them.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use project_git::prelude::*;
//!
//! let mut git = GitIntegration::new(MemoryStore::new(), Arc::new(HttpTransport::new()?));
//! let credentials = Credentials::from_env();
//!
//! let project = git.store_mut().create_project("My Cool Project")?;
//! git.assign_existing_repository(&credentials, project.id)?;
//!
//! let task = git.store_mut().create_task(project.id, "Fix Login Bug")?;
//! let created = git.create_branch(&credentials, task.id, &UserRef::new("octocat"))?;
//! println!("{}", created);
//! # Ok::<(), project_git::error::GitSyncError>(())
//! ```

mod branch;
mod commits;
mod linker;
mod pulls;

pub use branch::{BranchCreated, BranchManager};
pub use commits::{CommitSynchronizer, CommitsFetched};
pub use linker::{RepositoryLinked, RepositoryLinker};
pub use pulls::{PullRequestDraft, PullRequestOpened, PullRequestSynchronizer, PullRequestsFetched};

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};

use crate::config::Credentials;
use crate::error::{GitSyncError, Result};
use crate::github::{DEFAULT_API_URL, GitHubClient, Transport};
use crate::model::{Project, Task};
use crate::store::RecordStore;

/// Largest page GitHub serves; only the first page is ever read.
pub const PAGE_SIZE: u8 = 100;

/// GitHub integration over a record store.
pub struct GitIntegration<S> {
    store: S,
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl<S: RecordStore> GitIntegration<S> {
    pub fn new(store: S, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Use a GitHub Enterprise (or test) API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// A client for this call. Fails before any request when the token is missing.
    fn client(&self, credentials: &Credentials) -> Result<GitHubClient> {
        let token = credentials.token()?;
        Ok(GitHubClient::new(token, Arc::clone(&self.transport)).with_base_url(&self.base_url))
    }

    /// The task's project, which must already have a repository.
    fn linked_project(&self, task: &Task) -> Result<Project> {
        let project = self.store.project(task.project_id)?;
        if !project.is_linked() {
            return Err(GitSyncError::config(
                "The project must be linked to a GitHub repository first.",
            ));
        }
        Ok(project)
    }
}

/// Owner and name of a linked project's repository.
fn repository_coordinates(project: &Project) -> Result<(&str, &str)> {
    let link = &project.repository;
    let name = link
        .repository_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            GitSyncError::config("The project must be linked to a GitHub repository first.")
        })?;
    let owner = link
        .repository_owner
        .as_deref()
        .filter(|owner| !owner.is_empty())
        .ok_or_else(|| {
            GitSyncError::config(format!("Repository '{}' has no owner recorded.", name))
        })?;
    Ok((owner, name))
}

/// Replace an upstream error carrying `status` with a more specific one.
fn on_status(
    err: GitSyncError,
    status: u16,
    specific: impl FnOnce() -> GitSyncError,
) -> GitSyncError {
    if err.status() == Some(status) {
        specific()
    } else {
        err
    }
}

/// Current time as a timezone-naive UTC instant.
fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
