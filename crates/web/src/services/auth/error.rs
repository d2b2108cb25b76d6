//! Auth provider error types.

use thiserror::Error;

/// Errors that can occur when talking to the hosted auth provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password rejected by the provider.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session could not be refreshed; the caller must sign in again.
    #[error("Session expired")]
    SessionExpired,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("Auth API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a provider response.
    #[error("Parse error: {0}")]
    Parse(String),
}
