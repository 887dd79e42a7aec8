//! In-memory record store.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GitSyncError, Result};
use crate::model::{
    BranchLink, CommitLogEntry, Project, ProjectId, PullRequestEntry, RepositoryLink, Task, TaskId,
};
use crate::store::RecordStore;

/// Records held in memory, with sequential ids starting at 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_project_id: ProjectId,
    next_task_id: TaskId,
    projects: BTreeMap<ProjectId, Project>,
    tasks: BTreeMap<TaskId, Task>,
    commits: Vec<CommitLogEntry>,
    pull_requests: Vec<PullRequestEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_task(&self, id: TaskId) -> Result<()> {
        if self.tasks.contains_key(&id) {
            Ok(())
        } else {
            Err(GitSyncError::MissingRecord { kind: "task", id })
        }
    }
}

impl RecordStore for MemoryStore {
    fn create_project(&mut self, name: &str) -> Result<Project> {
        self.next_project_id += 1;
        let project = Project {
            id: self.next_project_id,
            name: name.to_string(),
            repository: RepositoryLink::default(),
        };
        self.projects.insert(project.id, project.clone());
        Ok(project)
    }

    fn project(&self, id: ProjectId) -> Result<Project> {
        self.projects
            .get(&id)
            .cloned()
            .ok_or(GitSyncError::MissingRecord { kind: "project", id })
    }

    fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.values().cloned().collect())
    }

    fn save_project(&mut self, project: &Project) -> Result<()> {
        match self.projects.get_mut(&project.id) {
            Some(stored) => {
                *stored = project.clone();
                Ok(())
            }
            None => Err(GitSyncError::MissingRecord {
                kind: "project",
                id: project.id,
            }),
        }
    }

    fn create_task(&mut self, project_id: ProjectId, name: &str) -> Result<Task> {
        if !self.projects.contains_key(&project_id) {
            return Err(GitSyncError::MissingRecord {
                kind: "project",
                id: project_id,
            });
        }

        self.next_task_id += 1;
        let task = Task {
            id: self.next_task_id,
            project_id,
            name: name.to_string(),
            branch: BranchLink::default(),
        };
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn task(&self, id: TaskId) -> Result<Task> {
        self.tasks
            .get(&id)
            .cloned()
            .ok_or(GitSyncError::MissingRecord { kind: "task", id })
    }

    fn tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .cloned()
            .collect())
    }

    fn save_task(&mut self, task: &Task) -> Result<()> {
        match self.tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(())
            }
            None => Err(GitSyncError::MissingRecord {
                kind: "task",
                id: task.id,
            }),
        }
    }

    fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks
            .remove(&id)
            .ok_or(GitSyncError::MissingRecord { kind: "task", id })?;
        self.commits.retain(|entry| entry.task_id != id);
        self.pull_requests.retain(|entry| entry.task_id != id);
        Ok(())
    }

    fn commits(&self, task_id: TaskId) -> Result<Vec<CommitLogEntry>> {
        let mut commits: Vec<_> = self
            .commits
            .iter()
            .filter(|entry| entry.task_id == task_id)
            .cloned()
            .collect();
        commits.sort_by_key(|entry| Reverse(entry.authored_date));
        Ok(commits)
    }

    fn insert_commits(&mut self, entries: Vec<CommitLogEntry>) -> Result<()> {
        for entry in &entries {
            self.ensure_task(entry.task_id)?;
        }
        self.commits.extend(entries);
        Ok(())
    }

    fn record_commit_sync(&mut self, task: &Task, entries: Vec<CommitLogEntry>) -> Result<()> {
        self.ensure_task(task.id)?;
        for entry in &entries {
            self.ensure_task(entry.task_id)?;
        }
        self.commits.extend(entries);
        self.save_task(task)
    }

    fn pull_requests(&self, task_id: TaskId) -> Result<Vec<PullRequestEntry>> {
        let mut pull_requests: Vec<_> = self
            .pull_requests
            .iter()
            .filter(|entry| entry.task_id == task_id)
            .cloned()
            .collect();
        pull_requests.sort_by_key(|entry| Reverse(entry.created_on));
        Ok(pull_requests)
    }

    fn insert_pull_requests(&mut self, entries: Vec<PullRequestEntry>) -> Result<()> {
        for entry in &entries {
            self.ensure_task(entry.task_id)?;
        }
        self.pull_requests.extend(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PullRequestStatus;
    use chrono::NaiveDate;

    fn commit(task_id: TaskId, hash: &str, day: u32) -> CommitLogEntry {
        CommitLogEntry {
            task_id,
            hash: hash.into(),
            message: format!("commit {hash}"),
            author_name: Some("Ada".into()),
            authored_date: NaiveDate::from_ymd_opt(2024, 1, day)
                .and_then(|d| d.and_hms_opt(12, 0, 0)),
            url: format!("https://github.com/o/r/commit/{hash}"),
            branch_name: "dev".into(),
        }
    }

    fn pull_request(task_id: TaskId, number: u64) -> PullRequestEntry {
        PullRequestEntry {
            task_id,
            number,
            title: format!("PR {number}"),
            url: format!("https://github.com/o/r/pull/{number}"),
            status: PullRequestStatus::Open,
            source_branch: "dev".into(),
            target_branch: "main".into(),
            created_on: None,
            merged_on: None,
            created_by: None,
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut store = MemoryStore::new();
        let a = store.create_project("A").unwrap();
        let b = store.create_project("B").unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let task = store.create_task(b.id, "T").unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(store.tasks(b.id).unwrap().len(), 1);
        assert!(store.tasks(a.id).unwrap().is_empty());
    }

    #[test]
    fn test_create_task_requires_project() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.create_task(9, "T"),
            Err(GitSyncError::MissingRecord { kind: "project", id: 9 })
        ));
    }

    #[test]
    fn test_commits_sorted_newest_first() {
        let mut store = MemoryStore::new();
        let project = store.create_project("P").unwrap();
        let task = store.create_task(project.id, "T").unwrap();

        store
            .insert_commits(vec![
                commit(task.id, "a", 1),
                commit(task.id, "c", 3),
                commit(task.id, "b", 2),
            ])
            .unwrap();

        let hashes: Vec<_> = store
            .commits(task.id)
            .unwrap()
            .into_iter()
            .map(|c| c.hash)
            .collect();
        assert_eq!(hashes, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_insert_for_unknown_task_writes_nothing() {
        let mut store = MemoryStore::new();
        let project = store.create_project("P").unwrap();
        let task = store.create_task(project.id, "T").unwrap();

        let result = store.insert_commits(vec![commit(task.id, "a", 1), commit(42, "b", 2)]);
        assert!(result.is_err());
        assert!(store.commits(task.id).unwrap().is_empty());
    }

    #[test]
    fn test_record_commit_sync_writes_commits_and_task() {
        let mut store = MemoryStore::new();
        let project = store.create_project("P").unwrap();
        let mut task = store.create_task(project.id, "T").unwrap();
        task.branch.last_synced_on = NaiveDate::from_ymd_opt(2024, 1, 5)
            .and_then(|d| d.and_hms_opt(9, 0, 0));

        store
            .record_commit_sync(&task, vec![commit(task.id, "a", 1)])
            .unwrap();

        assert_eq!(store.commits(task.id).unwrap().len(), 1);
        assert_eq!(store.task(task.id).unwrap(), task);
    }

    #[test]
    fn test_record_commit_sync_for_missing_task_writes_nothing() {
        let mut store = MemoryStore::new();
        let project = store.create_project("P").unwrap();
        let kept = store.create_task(project.id, "Kept").unwrap();
        let mut gone = store.create_task(project.id, "Gone").unwrap();
        store.delete_task(gone.id).unwrap();
        gone.branch.last_synced_on = NaiveDate::from_ymd_opt(2024, 1, 5)
            .and_then(|d| d.and_hms_opt(9, 0, 0));

        let result = store.record_commit_sync(&gone, vec![commit(kept.id, "a", 1)]);

        assert!(matches!(
            result,
            Err(GitSyncError::MissingRecord { kind: "task", .. })
        ));
        assert!(store.commits(kept.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_task_cascades() {
        let mut store = MemoryStore::new();
        let project = store.create_project("P").unwrap();
        let doomed = store.create_task(project.id, "Doomed").unwrap();
        let kept = store.create_task(project.id, "Kept").unwrap();

        store
            .insert_commits(vec![commit(doomed.id, "a", 1), commit(kept.id, "b", 1)])
            .unwrap();
        store
            .insert_pull_requests(vec![pull_request(doomed.id, 1), pull_request(kept.id, 2)])
            .unwrap();

        store.delete_task(doomed.id).unwrap();

        assert!(store.task(doomed.id).is_err());
        assert!(store.commits(doomed.id).unwrap().is_empty());
        assert!(store.pull_requests(doomed.id).unwrap().is_empty());
        assert_eq!(store.commits(kept.id).unwrap().len(), 1);
        assert_eq!(store.pull_requests(kept.id).unwrap().len(), 1);
    }

    #[test]
    fn test_save_unknown_project_fails() {
        let mut store = MemoryStore::new();
        let project = Project {
            id: 3,
            name: "Ghost".into(),
            repository: RepositoryLink::default(),
        };
        assert!(store.save_project(&project).is_err());
    }
}
