//! # booker-client
//!
//! Authenticated HTTP execution core for booking API test suites.
//!
//! Three composed components, leaves first:
//!
//! - **[`auth::TokenManager`]**: owns the current credential, its expiry
//!   and the lazy-refresh decision.
//! - **[`http::RequestExecutor`]**: builds authenticated requests, drives
//!   the retry/backoff loop, classifies outcomes and invokes logging.
//! - **[`logging::ResponseLogger`]**: redacts sensitive fields and emits
//!   structured, size-bounded log records.
//!
//! [`client::BookerClient`] wires them together for one test execution
//! unit; [`booking::BookingClient`] expresses each domain operation as one
//! execute call on top of it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use booker_client::{BookerClient, BookingClient, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder("https://restful-booker.example.com")
//!         .credentials("admin", "password123")
//!         .build()?;
//!
//!     let client = BookingClient::new(BookerClient::new(config)?);
//!
//!     let created = client.create_booking(&booking).await?;
//!     let fetched = client.get_booking(created.bookingid).await?;
//!     let deleted = client.delete_booking(created.bookingid).await?;
//!     assert!(deleted.is_success());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - Transient outcomes (network failure, timeout, 5xx) retry up to the
//!   configured attempt limit with linear backoff; 4xx is a normal result.
//! - Auth tokens are acquired lazily via `POST /auth` and cached with a
//!   validity window; the credential is guarded against torn reads.
//! - Every attempt is logged with `token`/`password`/`username` values
//!   redacted and bodies truncated to a configured length.

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Client configuration and environment loading
pub mod config;

/// Token management
pub mod auth;

/// Request execution with retry and backoff
pub mod http;

/// Response logging with redaction
pub mod logging;

/// Base client composing config, tokens and executor
pub mod client;

/// Booking domain models and operations
pub mod booking;

// ============================================================================
// Re-exports
// ============================================================================

pub use booking::{Booking, BookingClient, BookingDates, BookingId, BookingResponse};
pub use client::BookerClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ExecutionResult, RequestExecutor, RequestSpec, RetryPolicy};
pub use logging::{ResponseLogger, REDACTED_PLACEHOLDER};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
