//! Token management
//!
//! The [`TokenManager`] owns the current credential and the lazy-refresh
//! decision: callers ask for a valid token and supply the credential
//! exchange as an async closure, which only runs when the cached token is
//! absent or expired.

mod manager;
mod types;

pub use manager::TokenManager;
pub use types::Credential;
