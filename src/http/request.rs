//! Request and result types
//!
//! A [`RequestSpec`] is immutable once built; the executor derives an
//! augmented header set per attempt without touching the caller's spec.

use crate::error::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// How many characters of a raw body a deserialization error carries.
const ERROR_BODY_SNIPPET_LEN: usize = 200;

/// Retry policy for the executor, read-only for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts per request, including the first (>= 1)
    pub max_attempts: u32,
    /// Base delay for linear backoff
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay inserted before retry `n` (the n-th retry follows n completed
    /// attempts): `base_delay * n`, monotonically increasing.
    pub fn backoff_delay(&self, completed_attempts: u32) -> Duration {
        self.base_delay * completed_attempts
    }
}

/// Specification of a single request
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL (or a full URL)
    pub path: String,
    /// Caller-supplied headers; names compare case-insensitively
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Whether the request must carry a valid token
    pub requires_auth: bool,
}

impl RequestSpec {
    /// Create a spec for the given method and path
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            requires_auth: false,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// PATCH request
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the request as requiring authentication
    #[must_use]
    pub fn with_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Check whether a header with this name is already present
    /// (case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

/// Outcome of an executed request.
///
/// Only produced when an attempt completed with a 2xx-4xx status.
/// Transient exhaustion (persistent 5xx or network failure) fails with
/// [`Error::RequestFailed`] instead, so a result is never partially
/// populated.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Final status code
    pub status: StatusCode,
    /// Raw response body
    pub body: String,
    /// Duration of the attempt that produced this result
    pub elapsed: Duration,
    /// Total attempts made, including the successful one (>= 1)
    pub attempts: u32,
}

impl ExecutionResult {
    /// Whether the final status is 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the final status is 4xx
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Deserialize the body into `T`.
    ///
    /// Fails with [`Error::Deserialization`] if the body is empty, is not a
    /// JSON object or array, or does not match `T`'s shape. The error
    /// carries `context` and a snippet of the raw body.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            return Err(self.deserialization_error(context, "response body is empty"));
        }

        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| self.deserialization_error(context, format!("invalid JSON: {e}")))?;

        if !matches!(value, Value::Object(_) | Value::Array(_)) {
            return Err(
                self.deserialization_error(context, "response body is not a JSON object or array")
            );
        }

        serde_json::from_value(value)
            .map_err(|e| self.deserialization_error(context, format!("shape mismatch: {e}")))
    }

    fn deserialization_error(&self, context: &str, message: impl Into<String>) -> Error {
        let snippet: String = self.body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
        Error::deserialization(
            format!("{context} (status {})", self.status.as_u16()),
            snippet,
            message,
        )
    }
}
