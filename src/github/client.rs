//! GitHub API client.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;

use crate::error::{GitSyncError, Result};
use crate::github::transport::{ApiRequest, ApiResponse, Transport};

/// Default public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Client for interacting with the GitHub API.
///
/// Holds one token. Status interpretation is left to callers because the
/// same status means different things to different operations.
#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) transport: Arc<dyn Transport>,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_API_URL.into(),
            transport,
        }
    }

    /// Point the client at a GitHub Enterprise (or test) base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        // Remove trailing slash if present
        if url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Get the default headers for API requests.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| GitSyncError::config("GitHub token contains invalid characters"))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("project-git"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse> {
        let request = ApiRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers: self.headers()?,
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
            body,
        };
        self.transport.send(&request)
    }

    /// Make a GET request to the GitHub API.
    pub(crate) fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        self.request(Method::GET, endpoint, query, None)
    }

    /// Make a POST request to the GitHub API.
    pub(crate) fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, &[], Some(body))
    }

    /// Decode a response that must carry exactly `expected` status.
    ///
    /// Any other status becomes [`GitSyncError::Upstream`].
    pub(crate) fn expect<T: serde::de::DeserializeOwned>(
        response: ApiResponse,
        expected: u16,
        context: &str,
    ) -> Result<T> {
        if response.status != expected {
            return Err(response.into_upstream_error());
        }
        response.json(context)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Encode a path segment. Slashes inside branch names are kept as separators.
pub(crate) fn encode_path(segment: &str) -> String {
    segment
        .split('/')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl Transport for Recorder {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ApiResponse::new(200, "{}"))
        }
    }

    #[test]
    fn test_requests_carry_auth_and_version_headers() {
        let recorder = Arc::new(Recorder::default());
        let client = GitHubClient::new("test_token", recorder.clone());

        client.get("/user", &[]).unwrap();

        let requests = recorder.requests.lock().unwrap();
        let headers = &requests[0].headers;
        assert_eq!(requests[0].url, "https://api.github.com/user");
        assert_eq!(headers[AUTHORIZATION], "Bearer test_token");
        assert_eq!(headers[ACCEPT], "application/vnd.github+json");
        assert_eq!(headers["X-GitHub-Api-Version"], "2022-11-28");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = GitHubClient::new("t", Arc::new(Recorder::default()))
            .with_base_url("https://github.example.com/api/v3/");
        assert_eq!(client.base_url(), "https://github.example.com/api/v3");
    }

    #[test]
    fn test_post_serializes_body() {
        let recorder = Arc::new(Recorder::default());
        let client = GitHubClient::new("t", recorder.clone());

        client
            .post("/user/repos", &serde_json::json!({"name": "x"}))
            .unwrap();

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].body, Some(serde_json::json!({"name": "x"})));
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let client = GitHubClient::new("bad\ntoken", Arc::new(Recorder::default()));
        assert!(matches!(
            client.get("/user", &[]),
            Err(GitSyncError::Config(_))
        ));
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("release/1.0"), "release/1.0");
        assert_eq!(encode_path("a b"), "a%20b");
    }
}
