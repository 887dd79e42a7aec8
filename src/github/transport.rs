//! HTTP transport for GitHub API requests.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GitSyncError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully-built request, ready to send.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Value of a query parameter, if present.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body into a typed schema.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| GitSyncError::Decode {
            context: context.to_string(),
            message: e.to_string(),
        })
    }

    /// Human-readable failure message.
    ///
    /// GitHub error bodies carry a `message` field; anything else is returned raw.
    pub fn error_message(&self) -> String {
        match serde_json::from_str::<serde_json::Value>(&self.body) {
            Ok(serde_json::Value::Object(map)) => match map.get("message") {
                Some(serde_json::Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => self.body.clone(),
            },
            _ => self.body.clone(),
        }
    }

    /// Like [`error_message`](Self::error_message), with any validation
    /// `errors` array appended.
    pub fn detailed_error_message(&self) -> String {
        let message = self.error_message();
        match serde_json::from_str::<serde_json::Value>(&self.body) {
            Ok(value) if value.get("message").is_some() => match value.get("errors") {
                Some(errors) => format!("{message} Details: {errors}"),
                None => message,
            },
            _ => message,
        }
    }

    pub fn into_upstream_error(self) -> GitSyncError {
        GitSyncError::Upstream {
            status: self.status,
            message: self.error_message(),
        }
    }
}

/// Sends requests to the GitHub API.
///
/// Implementations must not retry. A failure before any response is a
/// [`GitSyncError::Network`]; every response, success or not, is returned as-is.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GitSyncError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        debug!(method = %request.method, url = %request.url, "sending GitHub request");

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| GitSyncError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GitSyncError::Network(e.to_string()))?;

        debug!(status, url = %request.url, "received GitHub response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json_body() {
        let response = ApiResponse::new(401, r#"{"message":"Bad credentials"}"#);
        assert_eq!(response.error_message(), "Bad credentials");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        let response = ApiResponse::new(502, "Bad gateway");
        assert_eq!(response.error_message(), "Bad gateway");

        let response = ApiResponse::new(500, r#"{"error":"boom"}"#);
        assert_eq!(response.error_message(), r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_detailed_error_message_appends_validation_errors() {
        let response = ApiResponse::new(
            422,
            r#"{"message":"Validation Failed","errors":[{"code":"invalid","field":"head"}]}"#,
        );
        assert_eq!(
            response.detailed_error_message(),
            r#"Validation Failed Details: [{"code":"invalid","field":"head"}]"#
        );
    }

    #[test]
    fn test_into_upstream_error() {
        let err = ApiResponse::new(403, r#"{"message":"Forbidden"}"#).into_upstream_error();
        match err {
            GitSyncError::Upstream { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_decode_failure_is_decode_error() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Login {
            login: String,
        }

        let response = ApiResponse::new(200, r#"{"id":1}"#);
        let err = response.json::<Login>("user").unwrap_err();
        assert!(matches!(err, GitSyncError::Decode { ref context, .. } if context == "user"));
    }

    #[test]
    fn test_query_param_lookup() {
        let request = ApiRequest {
            method: Method::GET,
            url: "https://api.github.com/x".into(),
            headers: HeaderMap::new(),
            query: vec![("sha".into(), "main".into())],
            body: None,
        };
        assert_eq!(request.query_param("sha"), Some("main"));
        assert_eq!(request.query_param("per_page"), None);
    }
}
