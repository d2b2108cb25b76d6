//! Admin post manager.
//!
//! Posts travel to the registry as a single multipart submission (title,
//! excerpt, category, media); the registry stores the media itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use regpoint_core::PostId;

use crate::middleware::RequireAdmin;
use crate::registry::{MediaUpload, NewPost};
use crate::state::AppState;
use crate::sync::Collection;

use super::super::news::PostView;
use super::super::{Flash, redirect_with};

/// Post manager template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub posts: Vec<PostView>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub notices: Vec<String>,
}

/// Pull the post fields and optional media out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<NewPost, String> {
    let mut title = None;
    let mut excerpt = None;
    let mut category = None;
    let mut media = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| "Invalid upload".to_string())?
    {
        match field.name() {
            Some("title") => title = Some(field.text().await.map_err(|_| "Invalid title")?),
            Some("excerpt") => excerpt = Some(field.text().await.map_err(|_| "Invalid excerpt")?),
            Some("category") => {
                category = Some(field.text().await.map_err(|_| "Invalid category")?);
            }
            Some("media") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| "Could not read the uploaded file")?
                    .to_vec();
                if !bytes.is_empty() {
                    media = Some(MediaUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    let required = |value: Option<String>, label: &str| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("Please provide the {label}"))
    };

    Ok(NewPost {
        title: required(title, "title")?,
        excerpt: required(excerpt, "excerpt")?,
        category: required(category, "category")?,
        media,
    })
}

/// Display the post manager.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> impl IntoResponse {
    let notices = state.sync().resync(Collection::Posts, None).await;

    AdminPostsTemplate {
        posts: state.sync().posts().await.iter().map(PostView::from).collect(),
        success: flash.success,
        error: flash.error,
        notices: notices.into_iter().map(|n| n.message).collect(),
    }
}

/// Create a post, then re-fetch the collection.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Redirect {
    let post = match read_upload(multipart).await {
        Ok(post) => post,
        Err(message) => return redirect_with("/admin/posts", "error", &message),
    };

    let result = state.registry().create_post(&admin.access_token, post).await;

    state.sync().resync(Collection::Posts, None).await;

    match result {
        Ok(()) => redirect_with("/admin/posts", "success", "Post published"),
        Err(e) => {
            tracing::error!(error = %e, "Post create failed");
            redirect_with("/admin/posts", "error", "Could not publish the post, try again")
        }
    }
}

/// Delete a post by id, then re-fetch.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Redirect {
    let result = state
        .registry()
        .delete_post(&admin.access_token, PostId::new(id))
        .await;

    state.sync().resync(Collection::Posts, None).await;

    match result {
        Ok(()) => redirect_with("/admin/posts", "success", "Post deleted"),
        Err(e) => {
            tracing::error!(error = %e, post = id, "Post delete failed");
            redirect_with("/admin/posts", "error", "Could not delete the post, try again")
        }
    }
}
