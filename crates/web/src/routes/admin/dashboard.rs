//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use regpoint_core::ApplicationStatus;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub service_count: usize,
    pub slide_count: usize,
    pub post_count: usize,
    pub pending_count: usize,
    pub processing_count: usize,
    pub completed_count: usize,
    pub notices: Vec<String>,
}

/// Display the dashboard.
///
/// All four collections are fetched in one parallel fan-out; collections
/// that fail keep their last-good snapshot and surface a notice.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> impl IntoResponse {
    let notices = state.sync().sync_all(&admin.access_token).await;

    let applications = state.sync().applications().await;
    let count_with = |status: ApplicationStatus| {
        applications.iter().filter(|a| a.status == status).count()
    };

    DashboardTemplate {
        admin_email: admin.email.to_string(),
        service_count: crate::catalog::SERVICES.len(),
        slide_count: state.sync().slides().await.len(),
        post_count: state.sync().posts().await.len(),
        pending_count: count_with(ApplicationStatus::Pending),
        processing_count: count_with(ApplicationStatus::Processing),
        completed_count: count_with(ApplicationStatus::Completed),
        notices: notices.into_iter().map(|n| n.message).collect(),
    }
}
