//! News/content listing and detail.
//!
//! The listing fetch is the one place in the system with an in-flight
//! abort: it runs under a fixed wall-clock timeout and falls back to the
//! last-good snapshot when it elapses, surfacing the timeout as its own
//! notice rather than a generic failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use regpoint_core::PostId;

use crate::error::{AppError, Result};
use crate::registry::{MediaType, Post, RegistryError};
use crate::state::AppState;

/// Post display data for templates.
#[derive(Clone)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub media_url: Option<String>,
    pub is_video: bool,
    pub date: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.raw(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            media_url: post.media_url.clone(),
            is_video: post.media_type == Some(MediaType::Video),
            date: post.created_at.format("%-d %B %Y").to_string(),
        }
    }
}

/// The most recent `count` posts, newest first.
#[must_use]
pub fn recent_posts(posts: &[Post], count: usize) -> Vec<PostView> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.into_iter().take(count).map(PostView::from).collect()
}

/// Filter posts by active category and search term.
///
/// A post survives only if it matches both: the category must equal the
/// active one (no active category means all), and the title must contain
/// the search term case-insensitively (no term means all).
#[must_use]
pub fn filter_posts(posts: &[Post], category: Option<&str>, query: Option<&str>) -> Vec<Post> {
    let query = query.map(str::to_lowercase);
    posts
        .iter()
        .filter(|post| match category {
            Some(active) if !active.is_empty() => post.category == active,
            _ => true,
        })
        .filter(|post| match &query {
            Some(term) if !term.is_empty() => post.title.to_lowercase().contains(term),
            _ => true,
        })
        .cloned()
        .collect()
}

/// Distinct categories present in a post set, in first-seen order.
fn categories(posts: &[Post]) -> Vec<String> {
    let mut seen = Vec::new();
    for post in posts {
        if !seen.contains(&post.category) {
            seen.push(post.category.clone());
        }
    }
    seen
}

/// News listing query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct NewsQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// News listing template.
#[derive(Template, WebTemplate)]
#[template(path = "news/index.html")]
pub struct NewsIndexTemplate {
    pub posts: Vec<PostView>,
    pub categories: Vec<String>,
    pub active_category: String,
    pub query: String,
    pub notice: Option<String>,
}

/// Post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "news/show.html")]
pub struct NewsShowTemplate {
    pub post: PostView,
}

/// Display the news listing with category and search filters.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let (posts, notice) = match state.registry().get_posts_with_timeout().await {
        Ok(posts) => (posts, None),
        Err(e) => {
            let notice = if matches!(e, RegistryError::Timeout) {
                "Loading news timed out; showing the last loaded posts.".to_string()
            } else {
                "Could not load news; showing the last loaded posts.".to_string()
            };
            tracing::warn!(error = %e, "News fetch failed");
            (state.sync().posts().await, Some(notice))
        }
    };

    let filtered = filter_posts(&posts, params.category.as_deref(), params.q.as_deref());

    NewsIndexTemplate {
        posts: filtered.iter().map(PostView::from).collect(),
        categories: categories(&posts),
        active_category: params.category.unwrap_or_default(),
        query: params.q.unwrap_or_default(),
        notice,
    }
}

/// Display a single post.
///
/// # Errors
///
/// Returns 404 if the post doesn't exist.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let post = state
        .registry()
        .get_post(PostId::new(id))
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound("Post".to_string())
            } else {
                AppError::Registry(e)
            }
        })?;

    Ok(NewsShowTemplate {
        post: PostView::from(&post),
    })
}

/// Create the news routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show))
}
