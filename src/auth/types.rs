//! Credential type
//!
//! A credential pairs the opaque token string with its recorded expiry.
//! The whole value is replaced on every successful refresh; it is never
//! mutated field-by-field.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// An acquired token with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The opaque token string
    pub token: String,
    /// When the token expires. A credential without a recorded expiry is
    /// treated as always expired, forcing a refresh.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential with an explicit expiry
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Create a credential that expires `ttl` from now
    pub fn expires_in(token: impl Into<String>, ttl: Duration) -> Self {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(0));
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Check if the credential is expired.
    ///
    /// The boundary is inclusive: a token whose expiry equals the current
    /// instant is already expired. Absence of an expiry is always expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit instant (testable form)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }
}
