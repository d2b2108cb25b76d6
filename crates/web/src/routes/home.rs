//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::catalog::{self, ServiceView};
use crate::registry::Slide;
use crate::state::AppState;

use super::news::{self, PostView};

/// Number of recent posts shown on the home page.
const RECENT_POSTS: usize = 3;

/// Slide display data for templates.
#[derive(Clone)]
pub struct SlideView {
    pub section: String,
    pub media_url: String,
    pub is_video: bool,
}

impl From<&Slide> for SlideView {
    fn from(slide: &Slide) -> Self {
        Self {
            section: slide.section.clone(),
            media_url: slide.media_url.clone(),
            is_video: slide.media_type == crate::registry::MediaType::Video,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub services: Vec<ServiceView>,
    pub slides: Vec<SlideView>,
    pub posts: Vec<PostView>,
    pub notices: Vec<String>,
}

/// Display the home page.
///
/// The three public collections are fetched in parallel; a collection that
/// fails to load falls back to its last-good snapshot with a notice.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let notices = state.sync().sync_public().await;

    let services = catalog::merge_pricing(&state.sync().services().await);
    let slides: Vec<SlideView> = state.sync().slides().await.iter().map(SlideView::from).collect();
    let posts: Vec<PostView> = news::recent_posts(&state.sync().posts().await, RECENT_POSTS);

    HomeTemplate {
        services,
        slides,
        posts,
        notices: notices.into_iter().map(|n| n.message).collect(),
    }
}
