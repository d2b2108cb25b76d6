//! Auth route handlers.
//!
//! Credentials are never stored locally; sign-in is delegated to the hosted
//! auth provider and the resulting session is kept in the server-side
//! session under the single shared accessor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use regpoint_core::Email;

use crate::middleware::auth::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthError;
use crate::state::AppState;

use super::{Flash, redirect_with};

/// Minimum accepted password length for updates.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Sign-in form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Password-reset request form data.
#[derive(Deserialize)]
pub struct ForgotForm {
    pub email: String,
}

/// Update-password form data.
#[derive(Deserialize)]
pub struct PasswordForm {
    pub password: String,
    pub password_confirm: String,
}

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Password-reset request page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot.html")]
pub struct ForgotTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Update-password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/password.html")]
pub struct PasswordTemplate {
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the sign-in page.
#[instrument(skip_all)]
pub async fn login_page(Query(flash): Query<Flash>) -> impl IntoResponse {
    LoginTemplate {
        error: flash.error,
        success: flash.success,
    }
}

/// Sign in against the auth provider.
///
/// The admin identity lands on the back-office; everyone else returns to
/// the home page.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return redirect_with("/auth/login", "error", "Enter a valid email address")
            .into_response();
    };

    match state.auth().sign_in(&email, &form.password).await {
        Ok(provider_session) => {
            let user = CurrentUser::from(provider_session);
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!(error = %e, "Failed to persist session");
                return redirect_with("/auth/login", "error", "Could not sign you in, try again")
                    .into_response();
            }

            let is_admin = user.email == state.config().admin_email;
            Redirect::to(if is_admin { "/admin" } else { "/" }).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            redirect_with("/auth/login", "error", "Invalid email or password").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Sign-in failed");
            redirect_with(
                "/auth/login",
                "error",
                "The sign-in service is unavailable right now",
            )
            .into_response()
        }
    }
}

/// Sign out.
///
/// Provider revocation is best-effort; the local session is cleared
/// regardless.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(crate::models::session_keys::CURRENT_USER)
        .await
    {
        if let Err(e) = state.auth().sign_out(&user.access_token).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!(error = %e, "Failed to clear session");
    }

    Redirect::to("/")
}

/// Display the password-reset request page.
#[instrument(skip_all)]
pub async fn forgot_page(Query(flash): Query<Flash>) -> impl IntoResponse {
    ForgotTemplate {
        error: flash.error,
        success: flash.success,
    }
}

/// Request a password-reset email from the provider.
#[instrument(skip_all)]
pub async fn forgot(State(state): State<AppState>, Form(form): Form<ForgotForm>) -> Redirect {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return redirect_with("/auth/forgot", "error", "Enter a valid email address");
    };

    let redirect_url = format!("{}/auth/password", state.config().base_url);
    match state
        .auth()
        .request_password_reset(&email, &redirect_url)
        .await
    {
        Ok(()) => redirect_with(
            "/auth/forgot",
            "success",
            "If that address has an account, a reset link is on its way",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Password-reset request failed");
            redirect_with(
                "/auth/forgot",
                "error",
                "Could not send the reset email, please try again",
            )
        }
    }
}

/// Display the update-password page.
#[instrument(skip_all)]
pub async fn password_page(
    RequireAuth(user): RequireAuth,
    Query(flash): Query<Flash>,
) -> impl IntoResponse {
    PasswordTemplate {
        email: user.email.to_string(),
        error: flash.error,
        success: flash.success,
    }
}

/// Update the signed-in user's password at the provider.
#[instrument(skip_all)]
pub async fn update_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<PasswordForm>,
) -> Redirect {
    if form.password.len() < MIN_PASSWORD_LENGTH {
        return redirect_with(
            "/auth/password",
            "error",
            "Password must be at least 8 characters",
        );
    }
    if form.password != form.password_confirm {
        return redirect_with("/auth/password", "error", "Passwords do not match");
    }

    match state
        .auth()
        .update_password(&user.access_token, &form.password)
        .await
    {
        Ok(()) => redirect_with("/auth/password", "success", "Password updated"),
        Err(e) => {
            tracing::error!(error = %e, "Password update failed");
            redirect_with(
                "/auth/password",
                "error",
                "Could not update your password, please try again",
            )
        }
    }
}
