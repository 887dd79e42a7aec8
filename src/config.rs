//! Credentials and persisted settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GitSyncError, Result};
use crate::github::{DEFAULT_API_URL, transport::DEFAULT_TIMEOUT};

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const APP_DIR: &str = "project-git";

/// Credentials handed to every operation.
///
/// The host decides where the token comes from and when to reload it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    github_token: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            github_token: Some(token.into()),
        }
    }

    /// Credentials with no token; every GitHub operation will refuse them.
    pub fn none() -> Self {
        Self::default()
    }

    /// Read the token from `GITHUB_TOKEN`, if set.
    pub fn from_env() -> Self {
        Self {
            github_token: std::env::var(TOKEN_ENV_VAR).ok(),
        }
    }

    /// The token, or a configuration error if none is usable.
    pub fn token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                GitSyncError::config("No GitHub token found. Please configure it in the settings.")
            })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Settings stored in `config.yaml`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub github_token: Option<String>,
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Location of the record file. Defaults to the platform data directory.
    pub store_path: Option<PathBuf>,
    /// Login recorded as the acting user.
    pub user: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            store_path: None,
            user: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("store_path", &self.store_path)
            .field("user", &self.user)
            .finish()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file location.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| GitSyncError::config("Cannot determine config directory"))?;
        Ok(dir.join(APP_DIR).join("config.yaml"))
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Sets the GitHub token. An empty token clears it.
    pub fn set_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.github_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Sets the API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Record file path, falling back to the platform data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let dir = dirs::data_local_dir()
            .ok_or_else(|| GitSyncError::config("Cannot determine data directory"))?;
        Ok(dir.join(APP_DIR).join("records.json"))
    }

    /// Credentials for this session. `GITHUB_TOKEN` wins over the stored token.
    pub fn credentials(&self) -> Credentials {
        match Credentials::from_env() {
            env if env.token().is_ok() => env,
            _ => Credentials {
                github_token: self.github_token.clone(),
            },
        }
    }
}
