//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::RegPointConfig;
use crate::registry::RegistryClient;
use crate::services::auth::{AuthClient, AuthError};
use crate::services::storage::{StorageClient, StorageError};
use crate::sync::SyncController;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("auth client: {0}")]
    Auth(#[from] AuthError),
    #[error("storage client: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the remote clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RegPointConfig,
    pool: SqlitePool,
    auth: AuthClient,
    registry: RegistryClient,
    storage: StorageClient,
    sync: SyncController<RegistryClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote client fails to build.
    pub fn new(config: RegPointConfig, pool: SqlitePool) -> Result<Self, StateError> {
        let auth = AuthClient::new(&config)?;
        let registry = RegistryClient::new(&config);
        let storage = StorageClient::new(&config)?;
        let sync = SyncController::new(registry.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                auth,
                registry,
                storage,
                sync,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &RegPointConfig {
        &self.inner.config
    }

    /// Get a reference to the session-store connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the auth provider client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the registry API client.
    #[must_use]
    pub fn registry(&self) -> &RegistryClient {
        &self.inner.registry
    }

    /// Get a reference to the storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }

    /// Get a reference to the collection sync controller.
    #[must_use]
    pub fn sync(&self) -> &SyncController<RegistryClient> {
        &self.inner.sync
    }
}
