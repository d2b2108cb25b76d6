//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The store is the
//! durable local slot the checkout flow stages drafts in, so it outlives
//! restarts.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::RegPointConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "regpoint_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session store and run its migration.
///
/// # Errors
///
/// Returns an error if the sessions table cannot be created.
pub async fn create_session_store(pool: SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer with the `SQLite` store.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &RegPointConfig,
) -> SessionManagerLayer<SqliteStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
