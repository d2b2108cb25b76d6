//! Admin price console.
//!
//! Each row carries its own locally-scoped form; saving issues the PUT and
//! then unconditionally re-fetches the pricing collection, so the visible
//! price is always what the server holds. The save button is disabled
//! client-side while its request is in flight; that per-control serialization
//! is the only mutation coordination a single-operator console needs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use regpoint_core::Naira;

use crate::catalog::{self, ServiceView};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::sync::Collection;

use super::super::{Flash, redirect_with};

/// Price edit form (one per service row).
#[derive(Debug, Deserialize)]
pub struct PriceForm {
    pub price: String,
    #[serde(default)]
    pub original_price: Option<String>,
}

/// Price console template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/services.html")]
pub struct AdminServicesTemplate {
    pub services: Vec<ServiceView>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub notices: Vec<String>,
}

/// Display the price console.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> impl IntoResponse {
    let notices = state.sync().resync(Collection::Services, None).await;

    AdminServicesTemplate {
        services: catalog::merge_pricing(&state.sync().services().await),
        success: flash.success,
        error: flash.error,
        notices: notices.into_iter().map(|n| n.message).collect(),
    }
}

/// Update a service's price, then re-fetch the collection.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<PriceForm>,
) -> Redirect {
    if catalog::find(&id).is_none() {
        return redirect_with("/admin/services", "error", "Unknown service");
    }

    // ValidationFailure blocks locally before the PUT
    let price = match Naira::parse_display(&form.price) {
        Ok(amount) if amount.is_positive() => amount,
        _ => return redirect_with("/admin/services", "error", "Enter a valid positive price"),
    };
    let original_price = match form.original_price.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match Naira::parse_display(raw) {
            Ok(amount) => Some(amount),
            Err(_) => {
                return redirect_with("/admin/services", "error", "Enter a valid original price");
            }
        },
        _ => None,
    };

    let result = state
        .registry()
        .update_service_price(
            &admin.access_token,
            &id,
            &price.amount().to_string(),
            original_price.map(|p| p.amount().to_string()).as_deref(),
        )
        .await;

    // Mutation or not, the console re-reads the server's view
    state.sync().resync(Collection::Services, None).await;

    match result {
        Ok(()) => redirect_with("/admin/services", "success", "Price updated"),
        Err(e) => {
            tracing::error!(error = %e, service = %id, "Price update failed");
            redirect_with("/admin/services", "error", "Could not save the price, try again")
        }
    }
}
