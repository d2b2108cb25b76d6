//! Admin back-office routes.
//!
//! Every handler takes the `RequireAdmin` extractor, so authorization
//! resolves before any data fetch runs. Mutations follow the same shape
//! throughout: mutate, unconditionally re-fetch the affected collection,
//! redirect with a flash message.

pub mod applications;
pub mod dashboard;
pub mod posts;
pub mod services;
pub mod slides;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/services", get(services::index))
        .route("/services/{id}", post(services::update))
        .route("/slides", get(slides::index).post(slides::create))
        .route("/slides/{id}/delete", post(slides::delete))
        .route("/posts", get(posts::index).post(posts::create))
        .route("/posts/{id}/delete", post(posts::delete))
        .route("/applications", get(applications::index))
        .route("/applications/{id}/status", post(applications::update_status))
}
