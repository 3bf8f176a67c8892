//! Request execution
//!
//! The [`RequestExecutor`] builds authenticated requests, drives the
//! retry/backoff loop, classifies each attempt's outcome and hands every
//! attempt to the response logger before deciding whether to retry.
//!
//! # Outcome classification
//!
//! - **Transient**: transport error (including timeout) or status >= 500.
//!   Retried with linear backoff until attempts are exhausted, then
//!   surfaced as [`crate::Error::RequestFailed`].
//! - **Terminal**: any 2xx-4xx response. Returned to the caller as an
//!   [`ExecutionResult`] immediately; a 4xx is a normal result, not an error.

mod executor;
mod request;

pub use executor::RequestExecutor;
pub use request::{ExecutionResult, RequestSpec, RetryPolicy};
