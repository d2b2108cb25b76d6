//! Admin applications console.
//!
//! Status advances pending -> processing -> completed. The update carries
//! the applicant's email and business name so the registry can send the
//! notification as a side-effect of the status change.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use regpoint_core::{ApplicationId, ApplicationStatus};

use crate::middleware::RequireAdmin;
use crate::registry::Application;
use crate::state::AppState;
use crate::sync::Collection;

use super::super::{Flash, redirect_with};

/// Status update form (one per application row).
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub email: String,
    pub business_name: String,
}

/// Application display row.
#[derive(Clone)]
pub struct ApplicationRow {
    pub id: i64,
    pub business_name: String,
    pub director_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub next_status: Option<String>,
    pub payment_ref: String,
    pub date: String,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id.raw(),
            business_name: app
                .business_names
                .first()
                .cloned()
                .unwrap_or_default(),
            director_name: app.director.full_name.clone(),
            email: app.director.email.clone(),
            phone: app.director.phone.clone(),
            status: app.status.to_string(),
            next_status: app.status.next().map(|s| s.to_string()),
            payment_ref: app.payment_ref.clone(),
            date: app.created_at.format("%-d %B %Y").to_string(),
        }
    }
}

/// Applications console template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/applications.html")]
pub struct AdminApplicationsTemplate {
    pub applications: Vec<ApplicationRow>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub notices: Vec<String>,
}

/// Display the applications console.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> impl IntoResponse {
    let notices = state
        .sync()
        .resync(Collection::Applications, Some(&admin.access_token))
        .await;

    AdminApplicationsTemplate {
        applications: state
            .sync()
            .applications()
            .await
            .iter()
            .map(ApplicationRow::from)
            .collect(),
        success: flash.success,
        error: flash.error,
        notices: notices.into_iter().map(|n| n.message).collect(),
    }
}

/// Advance an application's status, then re-fetch.
#[instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let Some(status) = ApplicationStatus::parse(&form.status) else {
        return redirect_with("/admin/applications", "error", "Unknown status");
    };

    let result = state
        .registry()
        .update_application_status(
            &admin.access_token,
            ApplicationId::new(id),
            status,
            &form.email,
            &form.business_name,
        )
        .await;

    state
        .sync()
        .resync(Collection::Applications, Some(&admin.access_token))
        .await;

    match result {
        Ok(()) => redirect_with("/admin/applications", "success", "Application updated"),
        Err(e) => {
            tracing::error!(error = %e, application = id, "Status update failed");
            redirect_with(
                "/admin/applications",
                "error",
                "Could not update the application, try again",
            )
        }
    }
}
