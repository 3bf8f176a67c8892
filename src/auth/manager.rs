//! Token manager
//!
//! Guards the credential behind an async mutex so reads and the
//! read-check-refresh-store sequence are atomic with respect to each
//! other. Holding the lock across the refresh serializes concurrent
//! refreshes; a caller that arrives while a refresh is in flight waits
//! and then sees the fresh token instead of triggering its own exchange.

use super::types::Credential;
use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Owns the current credential and the lazy-refresh decision
#[derive(Debug)]
pub struct TokenManager {
    /// Validity window applied to tokens acquired through `get_valid_token`
    ttl: Duration,
    credential: Mutex<Option<Credential>>,
}

impl TokenManager {
    /// Create a manager with the given validity window for acquired tokens
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            credential: Mutex::new(None),
        }
    }

    /// Return the cached token if present and unexpired, otherwise run the
    /// supplied credential exchange and cache its result.
    ///
    /// A failing exchange propagates unchanged and leaves any previous
    /// credential in place.
    pub async fn get_valid_token<F, Fut>(&self, refresh: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut guard = self.credential.lock().await;

        if let Some(credential) = guard.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.token.clone());
            }
            debug!("cached token expired, refreshing");
        } else {
            debug!("no cached token, refreshing");
        }

        let token = refresh().await?;
        *guard = Some(Credential::expires_in(token.clone(), self.ttl));
        Ok(token)
    }

    /// Unconditionally overwrite the credential (used after an explicit
    /// authentication call).
    pub async fn set_token(&self, token: impl Into<String>, ttl: Duration) {
        let mut guard = self.credential.lock().await;
        *guard = Some(Credential::expires_in(token, ttl));
    }

    /// The current token, if one is cached (expired or not). Used for
    /// redaction, so even a stale token must be scrubbed from logs.
    pub async fn current_token(&self) -> Option<String> {
        let guard = self.credential.lock().await;
        guard.as_ref().map(|c| c.token.clone())
    }

    /// Drop the cached credential, forcing the next call to refresh
    pub async fn clear(&self) {
        let mut guard = self.credential.lock().await;
        *guard = None;
    }
}
