//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use project_git::github::{ApiRequest, ApiResponse, Transport};
use project_git::prelude::*;
use project_git::model::ConnectionStatus;

/// A transport that answers from a queue and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body.to_string())));
        self
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(GitSyncError::Network(message.into())));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GitSyncError::Network(format!(
                    "unexpected request {} {}",
                    request.method, request.url
                )))
            })
    }
}

pub fn token() -> Credentials {
    Credentials::new("test_token")
}

pub fn integration(transport: &Arc<ScriptedTransport>) -> GitIntegration<MemoryStore> {
    GitIntegration::new(MemoryStore::new(), transport.clone())
}

/// A project named "Test Project" linked to testuser/Test-Project, with one task.
pub fn linked_task(git: &mut GitIntegration<MemoryStore>, task_name: &str) -> (Project, Task) {
    let store = git.store_mut();
    let mut project = store.create_project("Test Project").unwrap();
    let link = &mut project.repository;
    link.repository_name = Some("Test-Project".into());
    link.repository_owner = Some("testuser".into());
    link.repository_url = Some("https://github.com/testuser/Test-Project".into());
    link.default_branch = "main".into();
    link.connection_status = ConnectionStatus::Connected;
    store.save_project(&project).unwrap();

    let task = store.create_task(project.id, task_name).unwrap();
    (project, task)
}

/// Give a task a dev branch without going through GitHub.
pub fn set_dev_branch(git: &mut GitIntegration<MemoryStore>, task_id: TaskId, branch: &str) {
    let store = git.store_mut();
    let mut task = store.task(task_id).unwrap();
    task.branch.dev_branch = Some(branch.into());
    store.save_task(&task).unwrap();
}

pub fn commit_json(sha: &str, message: &str, date: &str) -> serde_json::Value {
    serde_json::json!({
        "sha": sha,
        "html_url": format!("https://github.com/testuser/Test-Project/commit/{sha}"),
        "commit": {
            "message": message,
            "author": {"name": "Test User", "email": "t@example.com", "date": date}
        }
    })
}

pub fn pull_json(number: u64, state: &str, merged_at: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": format!("PR {number}"),
        "html_url": format!("https://github.com/testuser/Test-Project/pull/{number}"),
        "state": state,
        "head": {"ref": "test-task-1", "sha": "aaa"},
        "base": {"ref": "main", "sha": "bbb"},
        "created_at": format!("2024-02-{:02}T10:00:00Z", number),
        "merged_at": merged_at
    })
}
