//! Creating a task branch.

use std::fmt;

use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::{GitSyncError, Result};
use crate::github::RefOps;
use crate::integration::{GitIntegration, now, on_status, repository_coordinates};
use crate::model::{BranchStatus, TaskId, UserRef};
use crate::sanitize;
use crate::store::RecordStore;

/// A branch was created for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCreated {
    pub task_id: TaskId,
    pub branch: String,
    pub url: Option<String>,
    /// Commit the branch was created at.
    pub sha: String,
}

impl fmt::Display for BranchCreated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Branch \"{}\" created successfully!", self.branch)
    }
}

/// Creates task branches in the linked repository.
pub trait BranchManager {
    /// Create a branch named after the task from the project's default branch.
    ///
    /// Nothing is written until both the lookup of the default branch and the
    /// creation of the new reference have succeeded.
    fn create_branch(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
        actor: &UserRef,
    ) -> Result<BranchCreated>;
}

impl<S: RecordStore> BranchManager for GitIntegration<S> {
    fn create_branch(
        &mut self,
        credentials: &Credentials,
        task_id: TaskId,
        actor: &UserRef,
    ) -> Result<BranchCreated> {
        let mut task = self.store.task(task_id)?;
        let project = self.linked_project(&task)?;
        let client = self.client(credentials)?;

        let branch = sanitize::branch_name(&task.name);
        if branch.is_empty() {
            return Err(GitSyncError::config(format!(
                "Task name '{}' has no characters usable in a branch name.",
                task.name
            )));
        }

        let (owner, repo) = repository_coordinates(&project)?;
        let default_branch = project.default_branch();

        let base = client
            .get_branch_ref(owner, repo, default_branch)
            .map_err(|e| {
                on_status(e, 404, || {
                    GitSyncError::config(format!(
                        "Default branch '{}' not found in repository.",
                        default_branch
                    ))
                })
            })?;

        client
            .create_branch_ref(owner, repo, &branch, &base.object.sha)
            .map_err(|e| {
                on_status(e, 422, || {
                    GitSyncError::Conflict(format!("Branch '{}' already exists.", branch))
                })
            })
            .inspect_err(|e| warn!(task_id, %branch, error = %e, "branch creation failed"))?;

        let url = project.branch_url(&branch);
        let link = &mut task.branch;
        link.dev_branch = Some(branch.clone());
        link.dev_branch_url = url.clone();
        link.commit_branch = Some(branch.clone());
        link.commit_branch_url = url.clone();
        link.branch_status = BranchStatus::Active;
        link.branch_created_by = Some(actor.clone());
        link.branch_created_on = Some(now());
        self.store.save_task(&task)?;

        info!(task_id, %branch, base = %base.object.sha, "created task branch");
        Ok(BranchCreated {
            task_id,
            branch,
            url,
            sha: base.object.sha,
        })
    }
}
