//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding. Every user-facing error renders the generic failure
//! page with human-readable text; raw internals never reach production
//! views.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::registry::RegistryError;
use crate::services::auth::AuthError;
use crate::services::storage::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Auth provider operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Registry API operation failed.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Storage service operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Request blocked locally before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Generic failure page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        if matches!(
            self,
            Self::Registry(_) | Self::Storage(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::SessionExpired => {
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Registry(err) => match err {
                RegistryError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                RegistryError::Api { status: 404, .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Auth(AuthError::SessionExpired) => {
                "Your session has expired, please sign in again".to_string()
            }
            Self::Auth(_) => "The sign-in service is unavailable right now".to_string(),
            Self::Registry(RegistryError::Timeout) => {
                "The request timed out, please try again".to_string()
            }
            Self::Registry(_) | Self::Storage(_) => {
                "A connected service is unavailable right now, please try again".to_string()
            }
            Self::Session(_) | Self::Internal(_) => "Something went wrong on our end".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} was not found"),
        };

        (
            status,
            ErrorTemplate {
                status: status.as_u16(),
                message,
            },
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Post".to_string());
        assert_eq!(err.to_string(), "Not found: Post");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Registry(RegistryError::Timeout)),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            get_status(AppError::Registry(RegistryError::Api {
                status: 404,
                message: String::new()
            })),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("bad amount".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
