//! Base client
//!
//! [`BookerClient`] composes the transport, token manager and request
//! executor for one test execution unit. Each scenario owns its own
//! client; there is no shared mutable state between clients.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{ExecutionResult, RequestExecutor, RequestSpec};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Authenticated client for the booking API
#[derive(Debug)]
pub struct BookerClient {
    config: ClientConfig,
    executor: RequestExecutor,
}

impl BookerClient {
    /// Create a client from a validated config
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("booker-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;

        let executor = RequestExecutor::new(client, &config);
        Ok(Self { config, executor })
    }

    /// Create a client from the environment (`BOOKER_*` variables)
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying request executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Perform the credential exchange now and cache the token.
    ///
    /// Lazy acquisition makes this optional; it exists for steps that
    /// authenticate explicitly and assert on the exchange itself.
    pub async fn authenticate(&self) -> Result<String> {
        self.executor.authenticate().await
    }

    /// The currently cached token, if any
    pub async fn token(&self) -> Option<String> {
        self.executor.tokens().current_token().await
    }

    /// Unconditionally overwrite the cached token
    pub async fn set_token(&self, token: impl Into<String>, ttl: Duration) {
        self.executor.tokens().set_token(token, ttl).await;
    }

    /// Execute a request
    pub async fn execute(&self, spec: &RequestSpec) -> Result<ExecutionResult> {
        self.executor.execute(spec).await
    }

    /// Execute a request with a cancellation signal
    pub async fn execute_with_cancel(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        self.executor.execute_with_cancel(spec, cancel).await
    }

    /// Execute a request and deserialize the body into `T`
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        context: &str,
    ) -> Result<T> {
        self.executor.execute_json(spec, context).await
    }

    /// Health check: `GET /ping`, no authentication
    pub async fn ping(&self) -> Result<ExecutionResult> {
        self.execute(&RequestSpec::get("/ping")).await
    }
}
