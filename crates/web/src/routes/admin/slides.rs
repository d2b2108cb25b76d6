//! Admin slide manager.
//!
//! Upload pipeline: binary to the storage project, public URL back,
//! metadata row into the registry. Slides are never updated in place;
//! they are created and deleted by id.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use regpoint_core::SlideId;

use crate::middleware::RequireAdmin;
use crate::registry::{MediaType, NewSlide, Slide};
use crate::services::storage::StorageClient;
use crate::state::AppState;
use crate::sync::Collection;

use super::super::{Flash, redirect_with};

/// Slide manager template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/slides.html")]
pub struct AdminSlidesTemplate {
    pub slides: Vec<SlideRow>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub notices: Vec<String>,
}

/// Slide display row.
#[derive(Clone)]
pub struct SlideRow {
    pub id: i64,
    pub section: String,
    pub media_url: String,
    pub is_video: bool,
}

impl From<&Slide> for SlideRow {
    fn from(slide: &Slide) -> Self {
        Self {
            id: slide.id.raw(),
            section: slide.section.clone(),
            media_url: slide.media_url.clone(),
            is_video: slide.media_type == MediaType::Video,
        }
    }
}

/// Parsed multipart upload.
struct SlideUpload {
    section: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Pull the section tag and image out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<SlideUpload, String> {
    let mut section = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| "Invalid upload".to_string())?
    {
        match field.name() {
            Some("section") => {
                section = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| "Invalid section tag".to_string())?,
                );
            }
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| "Could not read the uploaded file".to_string())?;
                file = Some((content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let section = section
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Choose a section for the slide".to_string())?;
    let (content_type, bytes) = file.ok_or_else(|| "Choose a file to upload".to_string())?;
    if bytes.is_empty() {
        return Err("Choose a file to upload".to_string());
    }

    Ok(SlideUpload {
        section,
        content_type,
        bytes,
    })
}

/// Display the slide manager.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> impl IntoResponse {
    let notices = state.sync().resync(Collection::Slides, None).await;

    AdminSlidesTemplate {
        slides: state.sync().slides().await.iter().map(SlideRow::from).collect(),
        success: flash.success,
        error: flash.error,
        notices: notices.into_iter().map(|n| n.message).collect(),
    }
}

/// Upload a slide: storage first, metadata row second, then re-fetch.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Redirect {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(message) => return redirect_with("/admin/slides", "error", &message),
    };

    let name = StorageClient::object_name(&upload.content_type);
    let media_url = match state
        .storage()
        .upload(&name, &upload.content_type, upload.bytes)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "Slide media upload failed");
            return redirect_with("/admin/slides", "error", "Could not upload the file");
        }
    };

    let slide = NewSlide {
        section: upload.section,
        media_url,
        media_type: MediaType::from_content_type(&upload.content_type),
    };
    let result = state
        .registry()
        .create_slide(&admin.access_token, &slide)
        .await;

    state.sync().resync(Collection::Slides, None).await;

    match result {
        Ok(()) => redirect_with("/admin/slides", "success", "Slide added"),
        Err(e) => {
            tracing::error!(error = %e, "Slide metadata insert failed");
            redirect_with("/admin/slides", "error", "Could not save the slide, try again")
        }
    }
}

/// Delete a slide by id, then re-fetch.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Redirect {
    let result = state
        .registry()
        .delete_slide(&admin.access_token, SlideId::new(id))
        .await;

    state.sync().resync(Collection::Slides, None).await;

    match result {
        Ok(()) => redirect_with("/admin/slides", "success", "Slide deleted"),
        Err(e) => {
            tracing::error!(error = %e, slide = id, "Slide delete failed");
            redirect_with("/admin/slides", "error", "Could not delete the slide, try again")
        }
    }
}
