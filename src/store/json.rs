//! JSON-file-backed record store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GitSyncError, Result};
use crate::model::{CommitLogEntry, Project, ProjectId, PullRequestEntry, Task, TaskId};
use crate::store::{MemoryStore, RecordStore};

/// A [`MemoryStore`] written to disk after every mutation.
///
/// The file is replaced atomically (write to a sibling temp file, then rename),
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                GitSyncError::Storage(format!("Corrupt record file {}: {}", path.display(), e))
            })?
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.inner)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "flushed record store");
        Ok(())
    }

    /// Apply `change` to a scratch copy and keep it only if it and the flush succeed.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let previous = self.inner.clone();
        let result = change(&mut self.inner).and_then(|value| {
            self.flush()?;
            Ok(value)
        });
        if result.is_err() {
            self.inner = previous;
        }
        result
    }
}

impl RecordStore for JsonFileStore {
    fn create_project(&mut self, name: &str) -> Result<Project> {
        self.mutate(|store| store.create_project(name))
    }

    fn project(&self, id: ProjectId) -> Result<Project> {
        self.inner.project(id)
    }

    fn projects(&self) -> Result<Vec<Project>> {
        self.inner.projects()
    }

    fn save_project(&mut self, project: &Project) -> Result<()> {
        self.mutate(|store| store.save_project(project))
    }

    fn create_task(&mut self, project_id: ProjectId, name: &str) -> Result<Task> {
        self.mutate(|store| store.create_task(project_id, name))
    }

    fn task(&self, id: TaskId) -> Result<Task> {
        self.inner.task(id)
    }

    fn tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        self.inner.tasks(project_id)
    }

    fn save_task(&mut self, task: &Task) -> Result<()> {
        self.mutate(|store| store.save_task(task))
    }

    fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.mutate(|store| store.delete_task(id))
    }

    fn commits(&self, task_id: TaskId) -> Result<Vec<CommitLogEntry>> {
        self.inner.commits(task_id)
    }

    fn insert_commits(&mut self, entries: Vec<CommitLogEntry>) -> Result<()> {
        self.mutate(|store| store.insert_commits(entries))
    }

    fn record_commit_sync(&mut self, task: &Task, entries: Vec<CommitLogEntry>) -> Result<()> {
        self.mutate(|store| store.record_commit_sync(task, entries))
    }

    fn pull_requests(&self, task_id: TaskId) -> Result<Vec<PullRequestEntry>> {
        self.inner.pull_requests(task_id)
    }

    fn insert_pull_requests(&mut self, entries: Vec<PullRequestEntry>) -> Result<()> {
        self.mutate(|store| store.insert_pull_requests(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConnectionStatus;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("records.json")).unwrap();
        assert!(store.projects().unwrap().is_empty());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/records.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            let mut project = store.create_project("Test Project").unwrap();
            project.repository.repository_name = Some("Test-Project".into());
            project.repository.connection_status = ConnectionStatus::Connected;
            store.save_project(&project).unwrap();
            store.create_task(project.id, "Task").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        let project = store.project(1).unwrap();
        assert!(project.is_linked());
        assert_eq!(
            project.repository.connection_status,
            ConnectionStatus::Connected
        );
        assert_eq!(store.tasks(1).unwrap()[0].name, "Task");
    }

    #[test]
    fn test_failed_mutation_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.create_project("P").unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(store.create_task(99, "orphan").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(GitSyncError::Storage(_))
        ));
    }
}
