//! HTTP client for the policy backend REST API
//!
//! # Error Handling Strategy
//!
//! Every call goes through a single request wrapper that:
//!
//! - Builds the endpoint URL from the server root, the API prefix and a percent-encoded path
//! - Attaches JSON headers and a fresh `X-Request-Id` for log correlation
//! - Unwraps the `data` member of successful JSON bodies
//! - Maps non-success statuses to [`ApiError::Status`], carrying the server's `error.message`
//!   when one is present
//!
//! Callers never retry on their own; they turn the error into a user-facing message with
//! [`ApiError::user_message`].

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
