//! Record persistence for projects, tasks and their fetched git data.
//!
//! The synchronizers only need a narrow set of operations, captured by
//! [`RecordStore`]. Two implementations ship with the crate:
//! - [`MemoryStore`] keeps everything in memory
//! - [`JsonFileStore`] persists a [`MemoryStore`] to a JSON file after every change

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::model::{CommitLogEntry, Project, ProjectId, PullRequestEntry, Task, TaskId};

/// Storage for projects, tasks, commit log entries and pull request entries.
///
/// Commit hashes and pull request numbers are not checked for uniqueness
/// here; the synchronizers filter them before inserting.
pub trait RecordStore {
    /// Create a project with an unlinked repository.
    fn create_project(&mut self, name: &str) -> Result<Project>;

    fn project(&self, id: ProjectId) -> Result<Project>;

    fn projects(&self) -> Result<Vec<Project>>;

    /// Replace a stored project.
    fn save_project(&mut self, project: &Project) -> Result<()>;

    /// Create a task belonging to an existing project.
    fn create_task(&mut self, project_id: ProjectId, name: &str) -> Result<Task>;

    fn task(&self, id: TaskId) -> Result<Task>;

    fn tasks(&self, project_id: ProjectId) -> Result<Vec<Task>>;

    /// Replace a stored task.
    fn save_task(&mut self, task: &Task) -> Result<()>;

    /// Delete a task together with its commit and pull request entries.
    fn delete_task(&mut self, id: TaskId) -> Result<()>;

    /// Commits of a task, newest authored first.
    fn commits(&self, task_id: TaskId) -> Result<Vec<CommitLogEntry>>;

    /// Insert a batch of commit entries in one write.
    fn insert_commits(&mut self, entries: Vec<CommitLogEntry>) -> Result<()>;

    /// Insert new commit entries and replace the synced task in one write.
    /// Either both land or neither does.
    fn record_commit_sync(&mut self, task: &Task, entries: Vec<CommitLogEntry>) -> Result<()>;

    /// Pull requests of a task, newest created first.
    fn pull_requests(&self, task_id: TaskId) -> Result<Vec<PullRequestEntry>>;

    /// Insert a batch of pull request entries in one write.
    fn insert_pull_requests(&mut self, entries: Vec<PullRequestEntry>) -> Result<()>;
}
