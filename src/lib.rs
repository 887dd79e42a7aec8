//! # project-git
//!
//! Links project-management projects and tasks to a GitHub repository.
//!
//! This crate provides:
//! - Creating a repository for a project, or linking an existing one
//! - Creating a per-task branch off the project's default branch
//! - Recording a branch's commits on its task
//! - Recording, and opening, pull requests for a task
//!
//! Fetched data is persisted through a [`RecordStore`](store::RecordStore);
//! commits and pull requests are only ever added, never rewritten.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use project_git::prelude::*;
//!
//! let settings = Settings::load()?;
//! let credentials = settings.credentials();
//! let transport = Arc::new(HttpTransport::with_timeout(settings.request_timeout())?);
//! let store = JsonFileStore::open(settings.store_path()?)?;
//!
//! let mut git = GitIntegration::new(store, transport).with_base_url(&settings.api_base_url);
//!
//! let project = git.store_mut().create_project("My Cool Project")?;
//! let linked = git.create_repository(&credentials, project.id)?;
//! println!("{} ({})", linked, linked.repository_url);
//!
//! let task = git.store_mut().create_task(project.id, "Fix Login Bug")?;
//! git.create_branch(&credentials, task.id, &UserRef::new("octocat"))?;
//! println!("{}", git.fetch_commits(&credentials, task.id)?);
//! # Ok::<(), project_git::error::GitSyncError>(())
//! ```
//!
//! ## Errors
//!
//! Every operation returns a [`GitSyncError`](error::GitSyncError) on failure
//! and leaves stored records untouched. Nothing is retried.

pub mod config;
pub mod error;
pub mod github;
pub mod integration;
pub mod model;
pub mod sanitize;
pub mod store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{Credentials, Settings};
    pub use crate::error::{GitSyncError, Result};
    pub use crate::github::{GitHubClient, HttpTransport, Transport};
    pub use crate::integration::{
        BranchCreated, BranchManager, CommitSynchronizer, CommitsFetched, GitIntegration,
        PullRequestDraft, PullRequestOpened, PullRequestSynchronizer, PullRequestsFetched,
        RepositoryLinked, RepositoryLinker,
    };
    pub use crate::model::{
        BranchStatus, CommitLogEntry, ConnectionStatus, Project, ProjectId, PullRequestEntry,
        PullRequestStatus, Task, TaskId, UserRef,
    };
    pub use crate::sanitize::{branch_name, repository_name, sanitize};
    pub use crate::store::{JsonFileStore, MemoryStore, RecordStore};
}

pub use prelude::*;
