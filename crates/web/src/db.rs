//! Local `SQLite` database backing the session store.
//!
//! This is the only local persistence in the system: one durable key-value
//! surface holding sessions (and with them the staged draft application and
//! auth tokens). All business data lives behind the registry API.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Create a `SQLite` connection pool, creating the database file if needed.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the file cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
