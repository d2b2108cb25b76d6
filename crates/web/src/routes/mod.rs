//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (services, slides, recent posts)
//! GET  /health                  - Health check
//!
//! # Ordering
//! GET  /services/{id}           - Service detail + application form
//! POST /checkout                - Stage draft, initialize payment, redirect
//! GET  /checkout/confirm        - Payment confirmation callback
//! GET  /checkout/cancel         - Payment cancelled/closed
//!
//! # Content
//! GET  /news                    - News listing (category + search filter)
//! GET  /news/{id}               - Post detail
//! GET  /track                   - Application status lookup
//!
//! # Auth
//! GET  /auth/login              - Sign-in page
//! POST /auth/login              - Sign-in action
//! POST /auth/logout             - Sign-out action
//! GET  /auth/forgot             - Password-reset request page
//! POST /auth/forgot             - Password-reset request action
//! GET  /auth/password           - Update-password page (requires auth)
//! POST /auth/password           - Update-password action (requires auth)
//!
//! # Admin (requires the allow-listed admin identity)
//! GET  /admin                   - Dashboard (all collections, fanned out)
//! GET  /admin/services          - Price console
//! POST /admin/services/{id}     - Update a price, then re-fetch
//! GET  /admin/slides            - Slide manager
//! POST /admin/slides            - Upload slide (multipart)
//! POST /admin/slides/{id}/delete   - Delete slide
//! GET  /admin/posts             - Post manager
//! POST /admin/posts             - Create post (multipart)
//! POST /admin/posts/{id}/delete    - Delete post
//! GET  /admin/applications      - Applications console
//! POST /admin/applications/{id}/status - Advance application status
//! ```

pub mod admin;
pub mod auth;
pub mod checkout;
pub mod home;
pub mod news;
pub mod services;
pub mod track;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Flash messages passed between redirects as query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Redirect to a path with a flash message query parameter.
pub(crate) fn redirect_with(path: &str, key: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?{key}={}", urlencoding::encode(message)))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/forgot", get(auth::forgot_page).post(auth::forgot))
        .route("/password", get(auth::password_page).post(auth::update_password))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Ordering
        .route("/services/{id}", get(services::show))
        .route("/checkout", post(checkout::start))
        .route("/checkout/confirm", get(checkout::confirm))
        .route("/checkout/cancel", get(checkout::cancel))
        // Content
        .nest("/news", news::router())
        .route("/track", get(track::index))
        // Auth routes
        .nest("/auth", auth_routes())
        // Admin panel
        .nest("/admin", admin::router())
}
