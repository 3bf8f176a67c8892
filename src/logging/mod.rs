//! Response logging with redaction
//!
//! Every attempt the executor makes passes through [`ResponseLogger`]:
//! one summary line always, detailed header/body lines when detailed
//! logging is enabled or the attempt was unsuccessful (so failures stay
//! diagnosable with detailed logging off).
//!
//! Sensitive values never reach the log. JSON bodies are redacted
//! structurally (any `token`/`password`/`username` field at any depth);
//! non-JSON content falls back to replacing the raw token string.
//! Truncation happens after redaction and pretty-printing, and logging
//! itself never fails: unparseable input degrades to the raw-text path.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::info;


/// Placeholder written over sensitive values
pub const REDACTED_PLACEHOLDER: &str = "***REDACTED***";

/// JSON field names whose values are always redacted (case-insensitive)
const SENSITIVE_FIELDS: [&str; 3] = ["token", "password", "username"];

/// One request/response attempt, as seen by the logger
#[derive(Debug)]
pub struct AttemptRecord<'a> {
    /// HTTP method
    pub method: &'a Method,
    /// Resolved URL
    pub url: &'a str,
    /// Response status; absent for network-level failures
    pub status: Option<StatusCode>,
    /// Elapsed time for this attempt
    pub elapsed: Duration,
    /// Headers sent with the request
    pub request_headers: &'a [(String, String)],
    /// JSON request body, if any
    pub request_body: Option<&'a Value>,
    /// Raw response body; absent for network-level failures
    pub response_body: Option<&'a str>,
    /// Current token, used for fallback string redaction
    pub token: Option<&'a str>,
}

/// Emits structured, size-bounded, redacted log records
#[derive(Debug, Clone)]
pub struct ResponseLogger {
    detailed: bool,
    max_body_len: usize,
}

impl ResponseLogger {
    /// Create a logger
    pub fn new(detailed: bool, max_body_len: usize) -> Self {
        Self {
            detailed,
            max_body_len,
        }
    }

    /// Log one attempt. Never fails; bad input degrades to raw text.
    pub fn log(&self, record: &AttemptRecord<'_>) {
        let status_label = match record.status {
            Some(status) => status.as_u16().to_string(),
            None => "network failure".to_string(),
        };

        info!(
            "HTTP {} {} => {} in {} ms",
            record.method,
            record.url,
            status_label,
            record.elapsed.as_millis()
        );

        let success = record.status.is_some_and(|s| s.is_success());
        if !self.detailed && success {
            return;
        }

        let headers = format_headers(record.request_headers, record.token);
        let request_body = match record.request_body {
            Some(body) => self.sanitize_value(body, record.token),
            None => "[None]".to_string(),
        };
        let response_body = match record.response_body {
            Some(body) => self.sanitize_body(body, record.token),
            None => "[No content]".to_string(),
        };

        info!("Request Headers: {headers}");
        info!("Request Body: {request_body}");
        info!("Response Body: {response_body}");
    }

    /// Redact, pretty-print and truncate a raw body
    pub fn sanitize_body(&self, content: &str, token: Option<&str>) -> String {
        if content.is_empty() {
            return "[No content]".to_string();
        }

        match serde_json::from_str::<Value>(content) {
            Ok(mut value) => {
                redact_value(&mut value);
                let pretty = serde_json::to_string_pretty(&value)
                    .unwrap_or_else(|_| redact_text(content, token));
                truncate(&pretty, self.max_body_len)
            }
            // Malformed JSON: fall back to string-level redaction
            Err(_) => truncate(&redact_text(content, token), self.max_body_len),
        }
    }

    fn sanitize_value(&self, value: &Value, token: Option<&str>) -> String {
        let mut redacted = value.clone();
        redact_value(&mut redacted);
        let pretty = serde_json::to_string_pretty(&redacted)
            .unwrap_or_else(|_| redact_text(&value.to_string(), token));
        truncate(&pretty, self.max_body_len)
    }
}

/// Replace the value of every sensitive field, at any nesting depth
pub fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                if SENSITIVE_FIELDS
                    .iter()
                    .any(|field| key.eq_ignore_ascii_case(field))
                {
                    *item = Value::String(REDACTED_PLACEHOLDER.to_string());
                } else {
                    redact_value(item);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                redact_value(item);
            }
        }
        _ => {}
    }
}

/// Replace verbatim occurrences of the token in non-structural content
pub fn redact_text(content: &str, token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => content.replace(token, REDACTED_PLACEHOLDER),
        _ => content.to_string(),
    }
}

/// Truncate to `max_len` characters, appending an ellipsis marker
pub fn truncate(content: &str, max_len: usize) -> String {
    if content.chars().count() > max_len {
        let mut truncated: String = content.chars().take(max_len).collect();
        truncated.push_str("...");
        truncated
    } else {
        content.to_string()
    }
}

fn format_headers(headers: &[(String, String)], token: Option<&str>) -> String {
    if headers.is_empty() {
        return "[None]".to_string();
    }
    headers
        .iter()
        .map(|(name, value)| format!("{name}: {}", redact_text(value, token)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Initialize a `tracing` subscriber for test-suite binaries.
///
/// Respects `RUST_LOG`; defaults to the given level. Safe to call more
/// than once (later calls are no-ops).
pub fn init_tracing(default_level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .try_init();
}
