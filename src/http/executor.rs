//! Request executor
//!
//! Drives the per-call state machine: auth check, attempt, classify,
//! back off, retry. The loop iterates over an immutable attempt index and
//! accumulates a typed outcome; every attempt is logged before the retry
//! decision is acted on.

use super::request::{ExecutionResult, RequestSpec, RetryPolicy};
use crate::auth::TokenManager;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::logging::{AttemptRecord, ResponseLogger};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Cause of a transient attempt, kept for the terminal error
#[derive(Debug)]
enum TransientCause {
    /// Server error with its status and body
    Status(StatusCode, String),
    /// Transport-level failure (connect, timeout, read)
    Transport(reqwest::Error),
}

/// Executes requests against the booking API with auth, retries and logging
#[derive(Debug)]
pub struct RequestExecutor {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
    policy: RetryPolicy,
    token_ttl: Duration,
    tokens: TokenManager,
    logger: ResponseLogger,
}

impl RequestExecutor {
    /// Create an executor from a transport client and config
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };

        Self {
            client,
            base_url: config.base_url.clone(),
            credentials,
            policy: config.retry_policy(),
            token_ttl: config.token_ttl,
            tokens: TokenManager::new(config.token_ttl),
            logger: ResponseLogger::new(config.detailed_logging, config.max_log_body_len),
        }
    }

    /// The token manager owning the current credential
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// The retry policy in force
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Execute a request without external cancellation
    pub async fn execute(&self, spec: &RequestSpec) -> Result<ExecutionResult> {
        self.execute_with_cancel(spec, &CancellationToken::new())
            .await
    }

    /// Execute a request, observing `cancel` at the send boundary and
    /// during backoff sleeps.
    pub async fn execute_with_cancel(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let token = if spec.requires_auth {
            Some(self.valid_token(cancel).await?)
        } else {
            // Even unauthenticated calls may echo a token back; keep it
            // available for redaction.
            self.tokens.current_token().await
        };

        let url = self.build_url(&spec.path);
        let headers = normalized_headers(spec, token.as_deref());
        let body_bytes = match &spec.body {
            Some(body) => Some(serde_json::to_vec(body)?),
            None => None,
        };

        let mut last_cause: Option<TransientCause> = None;

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 {
                let delay = self.policy.backoff_delay(attempt - 1);
                debug!(
                    "backing off {:?} before attempt {}/{}",
                    delay, attempt, self.policy.max_attempts
                );
                tokio::select! {
                    () = cancel.cancelled() => return Err(Error::Cancelled),
                    () = tokio::time::sleep(delay) => {}
                }
            }

            let mut request = self.client.request(spec.method.clone(), &url);
            for (name, value) in &headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if let Some(bytes) = &body_bytes {
                request = request.body(bytes.clone());
            }

            let started = Instant::now();
            let outcome = tokio::select! {
                () = cancel.cancelled() => return Err(Error::Cancelled),
                result = request.send() => result,
            };

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let elapsed = started.elapsed();

                    self.logger.log(&AttemptRecord {
                        method: &spec.method,
                        url: &url,
                        status: Some(status),
                        elapsed,
                        request_headers: &headers,
                        request_body: spec.body.as_ref(),
                        response_body: Some(&body),
                        token: token.as_deref(),
                    });

                    if status.is_server_error() {
                        warn!(
                            "{} {} returned {}, attempt {}/{}",
                            spec.method,
                            url,
                            status.as_u16(),
                            attempt,
                            self.policy.max_attempts
                        );
                        last_cause = Some(TransientCause::Status(status, body));
                        continue;
                    }

                    // 2xx-4xx terminates the loop, success or not
                    return Ok(ExecutionResult {
                        status,
                        body,
                        elapsed,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    let elapsed = started.elapsed();

                    self.logger.log(&AttemptRecord {
                        method: &spec.method,
                        url: &url,
                        status: None,
                        elapsed,
                        request_headers: &headers,
                        request_body: spec.body.as_ref(),
                        response_body: None,
                        token: token.as_deref(),
                    });

                    warn!(
                        "{} {} failed ({}), attempt {}/{}",
                        spec.method, url, e, attempt, self.policy.max_attempts
                    );
                    last_cause = Some(TransientCause::Transport(e));
                    continue;
                }
            }
        }

        // Exhausted all attempts on a transient condition
        let (status, message) = match last_cause {
            Some(TransientCause::Status(status, body)) => (Some(status.as_u16()), body),
            Some(TransientCause::Transport(e)) => (None, e.to_string()),
            None => (None, "no attempts made".to_string()),
        };
        Err(Error::RequestFailed {
            attempts: self.policy.max_attempts,
            status,
            message,
        })
    }

    /// Execute a request and deserialize a successful body into `T`.
    ///
    /// `context` is a human-readable label used only in diagnostics.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        context: &str,
    ) -> Result<T> {
        self.execute_json_with_cancel(spec, context, &CancellationToken::new())
            .await
    }

    /// Typed variant of [`Self::execute_with_cancel`]
    pub async fn execute_json_with_cancel<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        context: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let result = self.execute_with_cancel(spec, cancel).await?;
        result.json(context)
    }

    /// Perform the credential exchange and cache the token unconditionally.
    ///
    /// `POST {base}/auth` with `{username, password}`, expecting `{token}`.
    /// Non-success responses have no guaranteed schema and surface as an
    /// opaque auth failure.
    pub async fn authenticate(&self) -> Result<String> {
        let token = self.fetch_token(&CancellationToken::new()).await?;
        self.tokens.set_token(token.clone(), self.token_ttl).await;
        Ok(token)
    }

    async fn valid_token(&self, cancel: &CancellationToken) -> Result<String> {
        if self.credentials.is_none() {
            return Err(Error::AuthRequired);
        }
        self.tokens
            .get_valid_token(|| self.fetch_token(cancel))
            .await
    }

    async fn fetch_token(&self, cancel: &CancellationToken) -> Result<String> {
        let (username, password) = self.credentials.as_ref().ok_or(Error::AuthRequired)?;

        let url = self.build_url("/auth");
        let request_body = json!({ "username": username, "password": password });
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];

        let mut request = self.client.request(reqwest::Method::POST, &url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = request.body(serde_json::to_vec(&request_body)?);

        let started = Instant::now();
        let outcome = tokio::select! {
            () = cancel.cancelled() => return Err(Error::Cancelled),
            result = request.send() => result,
        };
        let response = outcome.map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let elapsed = started.elapsed();

        self.logger.log(&AttemptRecord {
            method: &reqwest::Method::POST,
            url: &url,
            status: Some(status),
            elapsed,
            request_headers: &headers,
            request_body: Some(&request_body),
            response_body: Some(&body),
            token: None,
        });

        if !status.is_success() {
            return Err(Error::auth(format!(
                "token exchange returned {}: {body}",
                status.as_u16()
            )));
        }

        let auth: AuthResponse = serde_json::from_str(&body).map_err(|e| {
            Error::auth(format!("token exchange body did not parse: {e}; body: {body}"))
        })?;
        if auth.token.is_empty() {
            return Err(Error::auth("token exchange returned an empty token"));
        }
        Ok(auth.token)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Body of a successful `POST /auth` exchange
#[derive(Debug, Serialize, Deserialize)]
struct AuthResponse {
    token: String,
}

/// Derive the augmented header set for one request.
///
/// Ensures `Content-Type: application/json` and `Accept: application/json`
/// without duplicating caller-supplied equivalents (case-insensitive), and
/// injects the credential as both a bearer header and the cookie form the
/// booking API expects for writes, overwriting any caller value for those
/// names.
pub(crate) fn normalized_headers(
    spec: &RequestSpec,
    token: Option<&str>,
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = spec.headers.clone();

    if !spec.has_header("Content-Type") {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }
    if !spec.has_header("Accept") {
        headers.push(("Accept".to_string(), "application/json".to_string()));
    }

    if spec.requires_auth {
        if let Some(token) = token {
            headers.retain(|(name, _)| {
                !name.eq_ignore_ascii_case("Authorization") && !name.eq_ignore_ascii_case("Cookie")
            });
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            headers.push(("Cookie".to_string(), format!("token={token}")));
        }
    }

    headers
}
