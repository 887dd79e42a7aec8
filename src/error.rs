//! Error types for the GitHub integration.

use thiserror::Error;

/// The main error type for project/GitHub operations.
///
/// Every variant is terminal: nothing in this crate retries, and an operation
/// that fails leaves the stored records exactly as they were.
#[derive(Error, Debug)]
pub enum GitSyncError {
    /// Missing token, missing repository link, missing branch or an unusable name.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a response (DNS, connection refused, timeout).
    #[error("Network error connecting to GitHub: {0}")]
    Network(String),

    #[error("GitHub API Error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A success response whose body did not match the expected schema.
    #[error("Failed to parse {context} response: {message}")]
    Decode { context: String, message: String },

    #[error("{kind} {id} does not exist")]
    MissingRecord { kind: &'static str, id: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GitSyncError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status carried by the error, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for project/GitHub operations.
pub type Result<T> = std::result::Result<T, GitSyncError>;
