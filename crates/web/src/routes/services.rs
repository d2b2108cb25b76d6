//! Service detail and order form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::catalog::{self, ServiceView};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::sync::Collection;

use super::Flash;

/// Service detail template: description, pricing, and the order form
/// rendered from the service's field schema.
#[derive(Template, WebTemplate)]
#[template(path = "services/show.html")]
pub struct ServiceShowTemplate {
    pub service: ServiceView,
    pub error: Option<String>,
    pub notices: Vec<String>,
}

/// Display a service with its order form.
///
/// Prices are authoritative on the server, so the pricing collection is
/// re-fetched before the merge; a failed fetch falls back to the last-good
/// snapshot (or the built-in defaults) with a notice.
///
/// # Errors
///
/// Returns 404 for an unknown service id.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<impl IntoResponse> {
    let notices = state.sync().resync(Collection::Services, None).await;

    let services = catalog::merge_pricing(&state.sync().services().await);
    let service = services
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound("Service".to_string()))?;

    Ok(ServiceShowTemplate {
        service,
        error: flash.error,
        notices: notices.into_iter().map(|n| n.message).collect(),
    })
}
