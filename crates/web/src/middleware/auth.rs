//! Authentication extractors guarding protected views.
//!
//! Both extractors fail closed: any error reading the session is treated
//! the same as no session, and the caller is redirected to sign-in before
//! any protected markup is produced. The admin gate compares the session
//! identity against the single configured admin address; it is presentation
//! gating only, and the registry verifies the bearer token on every mutation.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use regpoint_core::Email;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Where the guard sends a request it cannot authorize.
pub const SIGN_IN_PATH: &str = "/auth/login";

/// Outcome of the authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the protected subtree.
    Granted,
    /// Redirect to sign-in; nothing protected is rendered.
    Denied,
}

/// Decide whether a session may see a subtree.
///
/// | session | identity == admin (if required) | outcome  |
/// |---------|---------------------------------|----------|
/// | none    | n/a                             | denied   |
/// | present | required and mismatched         | denied   |
/// | present | matched, or not required        | granted  |
#[must_use]
pub fn authorize(identity: Option<&Email>, required_admin: Option<&Email>) -> Access {
    match (identity, required_admin) {
        (None, _) => Access::Denied,
        (Some(_), None) => Access::Granted,
        // Emails are normalized at parse time, so identity is plain equality
        (Some(identity), Some(admin)) => {
            if identity == admin {
                Access::Granted
            } else {
                Access::Denied
            }
        }
    }
}

/// Rejection redirecting an unauthorized caller to sign-in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to(SIGN_IN_PATH).into_response()
    }
}

/// Extractor that requires an authenticated session.
///
/// An expired access token gets one refresh attempt against the auth
/// provider; a failed refresh clears the session and redirects.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection)?;

        // Any session-read error is treated as "no session"
        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        if !user.is_expired(Utc::now()) {
            return Ok(Self(user));
        }

        // Token rotation: one refresh attempt, then fail closed
        match state.auth().refresh(&user.refresh_token).await {
            Ok(renewed) => {
                let user = CurrentUser::from(renewed);
                session
                    .insert(session_keys::CURRENT_USER, &user)
                    .await
                    .map_err(|_| AuthRejection)?;
                Ok(Self(user))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session refresh failed; signing out");
                let _ = session
                    .remove::<CurrentUser>(session_keys::CURRENT_USER)
                    .await;
                Err(AuthRejection)
            }
        }
    }
}

/// Extractor that requires the allow-listed admin identity.
///
/// Any authenticated non-admin identity is redirected exactly like an
/// anonymous caller.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        match authorize(Some(&user.email), Some(&state.config().admin_email)) {
            Access::Granted => Ok(Self(user)),
            Access::Denied => Err(AuthRejection),
        }
    }
}

/// Helper to store the signed-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the signed-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[test]
    fn test_no_session_is_denied() {
        let admin = email("admin@regpoint.ng");
        assert_eq!(authorize(None, Some(&admin)), Access::Denied);
        assert_eq!(authorize(None, None), Access::Denied);
    }

    #[test]
    fn test_mismatched_identity_is_denied() {
        let admin = email("admin@regpoint.ng");
        let other = email("user@example.com");
        assert_eq!(authorize(Some(&other), Some(&admin)), Access::Denied);
    }

    #[test]
    fn test_matched_identity_is_granted() {
        let admin = email("admin@regpoint.ng");
        assert_eq!(authorize(Some(&admin), Some(&admin)), Access::Granted);
    }

    #[test]
    fn test_admin_match_survives_casing_differences() {
        // Normalization happens in Email::parse, so a shouty sign-in still
        // matches the configured identity.
        let admin = email("admin@regpoint.ng");
        let shouty = email("Admin@RegPoint.NG");
        assert_eq!(authorize(Some(&shouty), Some(&admin)), Access::Granted);
    }

    #[test]
    fn test_any_session_passes_when_admin_not_required() {
        let user = email("user@example.com");
        assert_eq!(authorize(Some(&user), None), Access::Granted);
    }
}
