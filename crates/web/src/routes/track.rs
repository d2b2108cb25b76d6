//! Public application tracker.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::registry::TrackRecord;
use crate::state::AppState;

/// Tracker query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct TrackQuery {
    pub query: Option<String>,
}

/// Track record display data.
#[derive(Clone)]
pub struct TrackRecordView {
    pub reference: String,
    pub business_name: String,
    pub status: String,
    pub date: String,
}

impl From<&TrackRecord> for TrackRecordView {
    fn from(record: &TrackRecord) -> Self {
        Self {
            reference: record.reference.clone(),
            business_name: record.business_name.clone(),
            status: record.status.to_string(),
            date: record
                .created_at
                .map(|d| d.format("%-d %B %Y").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Tracker page template.
#[derive(Template, WebTemplate)]
#[template(path = "track.html")]
pub struct TrackTemplate {
    pub query: String,
    pub searched: bool,
    pub records: Vec<TrackRecordView>,
    pub notice: Option<String>,
}

/// Look up application status by email or payment reference.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<TrackQuery>,
) -> impl IntoResponse {
    let query = params.query.unwrap_or_default().trim().to_string();

    if query.is_empty() {
        return TrackTemplate {
            query,
            searched: false,
            records: Vec::new(),
            notice: None,
        };
    }

    match state.registry().track(&query).await {
        Ok(records) => TrackTemplate {
            records: records.iter().map(TrackRecordView::from).collect(),
            query,
            searched: true,
            notice: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Tracker lookup failed");
            TrackTemplate {
                query,
                searched: true,
                records: Vec::new(),
                notice: Some("The tracker is unavailable right now, please try again.".to_string()),
            }
        }
    }
}
