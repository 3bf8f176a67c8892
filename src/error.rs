//! Error types for booker-client
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Note that a 4xx response is not an error: it terminates the retry loop
//! and is handed back to the caller as a normal [`crate::http::ExecutionResult`].

use thiserror::Error;

/// The main error type for booker-client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    /// Auth was requested but no credentials are configured. Fatal to the
    /// call, never retried.
    #[error("Authentication required but no credentials are configured")]
    AuthRequired,

    /// The credential exchange itself failed (non-success response from the
    /// auth endpoint, or a token missing from its body).
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Retries exhausted on a transient condition (network failure or 5xx).
    #[error("Request failed after {attempts} attempt(s) ({}): {message}", status_label(.status))]
    RequestFailed {
        attempts: u32,
        /// Status of the last attempt, absent for network-level failures.
        status: Option<u16>,
        message: String,
    },

    #[error("Request cancelled")]
    Cancelled,

    // ============================================================================
    // Response Processing Errors
    // ============================================================================
    /// A successful response body did not parse into the expected shape.
    /// Carries the caller-supplied context and a snippet of the raw body
    /// so the failure is diagnosable without re-running.
    #[error("{context}: failed to deserialize response: {message}; body: {body}")]
    Deserialization {
        context: String,
        body: String,
        message: String,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("last status {code}"),
        None => "network failure".to_string(),
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a deserialization error with caller context and the raw body
    pub fn deserialization(
        context: impl Into<String>,
        body: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Deserialization {
            context: context.into(),
            body: body.into(),
            message: message.into(),
        }
    }

    /// Check if this error describes a transient condition
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::RequestFailed { status, .. } => match status {
                Some(code) => is_retryable_status(*code),
                None => true,
            },
            _ => false,
        }
    }
}

/// Check if an HTTP status code is transient (eligible for retry).
///
/// Only server errors qualify; 4xx (including 429) is a terminal client
/// result for this API.
pub fn is_retryable_status(status: u16) -> bool {
    status >= 500
}

/// Result type alias for booker-client
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("base_url");
        assert_eq!(err.to_string(), "Missing required config field: base_url");

        let err = Error::AuthRequired;
        assert_eq!(
            err.to_string(),
            "Authentication required but no credentials are configured"
        );
    }

    #[test]
    fn test_request_failed_display() {
        let err = Error::RequestFailed {
            attempts: 3,
            status: Some(503),
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed after 3 attempt(s) (last status 503): Service Unavailable"
        );

        let err = Error::RequestFailed {
            attempts: 3,
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("network failure"));
    }

    #[test]
    fn test_deserialization_display() {
        let err = Error::deserialization("get booking 42", "<html>", "expected JSON");
        let rendered = err.to_string();
        assert!(rendered.contains("get booking 42"));
        assert!(rendered.contains("<html>"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RequestFailed {
            attempts: 1,
            status: Some(500),
            message: String::new()
        }
        .is_retryable());
        assert!(Error::RequestFailed {
            attempts: 1,
            status: None,
            message: String::new()
        }
        .is_retryable());

        assert!(!Error::RequestFailed {
            attempts: 1,
            status: Some(404),
            message: String::new()
        }
        .is_retryable());
        assert!(!Error::AuthRequired.is_retryable());
        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_retryable_status_boundaries() {
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(599));
        assert!(!is_retryable_status(499));
        assert!(!is_retryable_status(429));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(200));
    }
}
