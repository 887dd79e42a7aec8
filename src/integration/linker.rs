//! Creating or discovering a project's repository.

use std::fmt;

use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::{GitSyncError, Result};
use crate::github::{GitHubRepo, NewRepository, RepoOps};
use crate::integration::{GitIntegration, now, on_status};
use crate::model::{ConnectionStatus, DEFAULT_BRANCH, Project, ProjectId};
use crate::sanitize;
use crate::store::RecordStore;

/// A project was linked to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLinked {
    pub project_id: ProjectId,
    pub repository_name: String,
    pub repository_url: String,
    /// True when the repository was created rather than found.
    pub created: bool,
}

impl fmt::Display for RepositoryLinked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created {
            write!(f, "GitHub repository created successfully!")
        } else {
            write!(
                f,
                "Existing repository \"{}\" linked successfully!",
                self.repository_name
            )
        }
    }
}

/// Links projects to GitHub repositories.
pub trait RepositoryLinker {
    /// Create a public, auto-initialized repository named after the project.
    fn create_repository(
        &mut self,
        credentials: &Credentials,
        project_id: ProjectId,
    ) -> Result<RepositoryLinked>;

    /// Link the authenticated user's repository named after the project.
    fn assign_existing_repository(
        &mut self,
        credentials: &Credentials,
        project_id: ProjectId,
    ) -> Result<RepositoryLinked>;
}

impl<S: RecordStore> RepositoryLinker for GitIntegration<S> {
    fn create_repository(
        &mut self,
        credentials: &Credentials,
        project_id: ProjectId,
    ) -> Result<RepositoryLinked> {
        let mut project = self.store.project(project_id)?;
        let client = self.client(credentials)?;
        let repo_name = required_repository_name(&project, "create")?;

        let request = NewRepository::public(
            &repo_name,
            format!("Repository for project: {}", project.name),
        );
        let repo = client.create_user_repo(&request).inspect_err(|e| {
            warn!(project_id, repository = %repo_name, error = %e, "repository creation failed");
        })?;

        let linked = link_repository(&mut project, &repo, true);
        self.store.save_project(&project)?;

        info!(project_id, repository = %linked.repository_name, "created GitHub repository");
        Ok(linked)
    }

    fn assign_existing_repository(
        &mut self,
        credentials: &Credentials,
        project_id: ProjectId,
    ) -> Result<RepositoryLinked> {
        let mut project = self.store.project(project_id)?;
        let client = self.client(credentials)?;
        let repo_name = required_repository_name(&project, "search for")?;

        let user = client.authenticated_user().map_err(|e| {
            on_status(e, 404, || {
                GitSyncError::NotFound(format!(
                    "No GitHub user found for this token while searching for repository '{}'.",
                    repo_name
                ))
            })
        })?;

        let repo = client.get_repo(&user.login, &repo_name).map_err(|e| {
            on_status(e, 404, || {
                GitSyncError::NotFound(format!(
                    "No existing repository found with name '{}' for user '{}'.",
                    repo_name, user.login
                ))
            })
        })?;

        let linked = link_repository(&mut project, &repo, false);
        self.store.save_project(&project)?;

        info!(project_id, repository = %linked.repository_name, owner = %user.login, "linked existing GitHub repository");
        Ok(linked)
    }
}

/// Sanitized repository name for a project, which must have a usable name.
fn required_repository_name(project: &Project, action: &str) -> Result<String> {
    if project.name.trim().is_empty() {
        return Err(GitSyncError::config(format!(
            "Project name is required to {} a repository.",
            action
        )));
    }

    let name = sanitize::repository_name(&project.name);
    if name.is_empty() {
        return Err(GitSyncError::config(format!(
            "Project name '{}' has no characters usable in a repository name.",
            project.name
        )));
    }
    Ok(name)
}

/// Write the repository fields onto the project and mark it connected.
fn link_repository(project: &mut Project, repo: &GitHubRepo, created: bool) -> RepositoryLinked {
    let link = &mut project.repository;
    link.repository_name = Some(repo.name.clone());
    link.repository_url = Some(repo.html_url.clone());
    link.repository_id = Some(repo.id.to_string());
    link.repository_owner = Some(repo.owner.login.clone());
    link.default_branch = repo
        .default_branch
        .clone()
        .filter(|branch| !branch.is_empty())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    link.connection_status = ConnectionStatus::Connected;
    link.connected_on = Some(now());

    RepositoryLinked {
        project_id: project.id,
        repository_name: repo.name.clone(),
        repository_url: repo.html_url.clone(),
        created,
    }
}
