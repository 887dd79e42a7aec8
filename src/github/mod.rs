//! GitHub REST API integration.
//!
//! This module provides a blocking client for the handful of endpoints the
//! project integration consumes:
//! - Create a repository, look one up, identify the token's account
//! - Resolve and create branch references
//! - List commits on a branch
//! - List and create pull requests
//!
//! Every response is decoded into a typed schema as soon as it arrives.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use project_git::github::{GitHubClient, HttpTransport, RepoOps};
//!
//! let client = GitHubClient::new("ghp_your_token_here", Arc::new(HttpTransport::new()?));
//! let me = client.authenticated_user()?;
//! let repo = client.get_repo(&me.login, "my-project")?;
//! println!("{}: {}", repo.name, repo.html_url);
//! # Ok::<(), project_git::error::GitSyncError>(())
//! ```

mod client;
mod commits;
mod pr;
mod refs;
mod repos;
pub mod transport;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use commits::{CommitDetails, CommitOps, CommitSignature, GitHubCommit};
pub use pr::{CreatePullRequest, PullRequest, PullRequestOps, PullRequestRef, PullRequestState};
pub use refs::{GitObject, GitRef, RefOps};
pub use repos::{GitHubRepo, GitHubUser, NewRepository, RepoOps};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
