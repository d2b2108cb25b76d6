//! Collection synchronization between the registry and view state.
//!
//! Screens read whole collections, never individual patches: the controller
//! fans out the fetches concurrently, joins once, and keeps a last-good
//! snapshot per collection. After any mutation the affected collection is
//! unconditionally re-fetched; there is no optimistic merge and no
//! distributed locking (a single admin operator is an assumption of the
//! system, not an oversight).

use moka::future::Cache;

use crate::registry::{
    Application, Post, RegistryClient, RegistryError, ServicePricing, Slide,
};

/// The remote collections a screen can sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Slides,
    Posts,
    Applications,
}

impl Collection {
    /// Human-readable collection name for notices and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Slides => "slides",
            Self::Posts => "posts",
            Self::Applications => "applications",
        }
    }
}

/// Last-good data for one collection.
#[derive(Debug, Clone)]
enum Snapshot {
    Services(Vec<ServicePricing>),
    Slides(Vec<Slide>),
    Posts(Vec<Post>),
    Applications(Vec<Application>),
}

/// Non-fatal notification that a collection could not be refreshed.
///
/// The previously loaded snapshot stays visible; the user may retry via the
/// explicit re-sync control.
#[derive(Debug, Clone)]
pub struct SyncNotice {
    pub collection: Collection,
    pub message: String,
}

impl SyncNotice {
    fn for_error(collection: Collection, error: &RegistryError) -> Self {
        let message = if matches!(error, RegistryError::Timeout) {
            format!("Loading {} timed out; showing the last loaded data.", collection.name())
        } else {
            format!("Could not refresh {}; showing the last loaded data.", collection.name())
        };
        Self {
            collection,
            message,
        }
    }
}

/// Fetch source the controller syncs from.
///
/// Seam between the controller and the registry client so the sync
/// semantics can be exercised without a live service.
#[allow(async_fn_in_trait)]
pub trait RemoteCollections {
    async fn fetch_services(&self) -> Result<Vec<ServicePricing>, RegistryError>;
    async fn fetch_slides(&self) -> Result<Vec<Slide>, RegistryError>;
    async fn fetch_posts(&self) -> Result<Vec<Post>, RegistryError>;
    async fn fetch_applications(&self, token: &str) -> Result<Vec<Application>, RegistryError>;
}

impl RemoteCollections for RegistryClient {
    async fn fetch_services(&self) -> Result<Vec<ServicePricing>, RegistryError> {
        self.get_services().await
    }

    async fn fetch_slides(&self) -> Result<Vec<Slide>, RegistryError> {
        self.get_slides().await
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, RegistryError> {
        self.get_posts().await
    }

    async fn fetch_applications(&self, token: &str) -> Result<Vec<Application>, RegistryError> {
        self.get_applications(token).await
    }
}

/// Per-collection snapshot store with explicit re-sync.
pub struct SyncController<C> {
    source: C,
    snapshots: Cache<Collection, Snapshot>,
}

impl<C: RemoteCollections> SyncController<C> {
    /// Create a controller over a fetch source.
    #[must_use]
    pub fn new(source: C) -> Self {
        Self {
            source,
            snapshots: Cache::builder().max_capacity(8).build(),
        }
    }

    /// Sync the public collections (services, slides, posts).
    ///
    /// All fetches issue concurrently; the controller waits for every one
    /// to settle before touching state.
    pub async fn sync_public(&self) -> Vec<SyncNotice> {
        let (services, slides, posts) = tokio::join!(
            self.source.fetch_services(),
            self.source.fetch_slides(),
            self.source.fetch_posts(),
        );

        let mut notices = Vec::new();
        self.apply(Collection::Services, services.map(Snapshot::Services), &mut notices)
            .await;
        self.apply(Collection::Slides, slides.map(Snapshot::Slides), &mut notices)
            .await;
        self.apply(Collection::Posts, posts.map(Snapshot::Posts), &mut notices)
            .await;
        notices
    }

    /// Sync every collection, including the authorized applications list.
    ///
    /// The caller resolves authorization first; the bearer token argument
    /// makes that ordering structural.
    pub async fn sync_all(&self, token: &str) -> Vec<SyncNotice> {
        let (services, slides, posts, applications) = tokio::join!(
            self.source.fetch_services(),
            self.source.fetch_slides(),
            self.source.fetch_posts(),
            self.source.fetch_applications(token),
        );

        let mut notices = Vec::new();
        self.apply(Collection::Services, services.map(Snapshot::Services), &mut notices)
            .await;
        self.apply(Collection::Slides, slides.map(Snapshot::Slides), &mut notices)
            .await;
        self.apply(Collection::Posts, posts.map(Snapshot::Posts), &mut notices)
            .await;
        self.apply(
            Collection::Applications,
            applications.map(Snapshot::Applications),
            &mut notices,
        )
        .await;
        notices
    }

    /// Unconditionally re-fetch one collection.
    ///
    /// Invoked after every mutation and by the manual re-sync control;
    /// repeated invocation is idempotent.
    pub async fn resync(&self, collection: Collection, token: Option<&str>) -> Vec<SyncNotice> {
        let mut notices = Vec::new();
        let result = match collection {
            Collection::Services => self.source.fetch_services().await.map(Snapshot::Services),
            Collection::Slides => self.source.fetch_slides().await.map(Snapshot::Slides),
            Collection::Posts => self.source.fetch_posts().await.map(Snapshot::Posts),
            Collection::Applications => match token {
                Some(token) => self
                    .source
                    .fetch_applications(token)
                    .await
                    .map(Snapshot::Applications),
                None => {
                    tracing::warn!("Applications resync requested without authorization");
                    return notices;
                }
            },
        };
        self.apply(collection, result, &mut notices).await;
        notices
    }

    /// Last-good services snapshot (empty if never loaded).
    pub async fn services(&self) -> Vec<ServicePricing> {
        match self.snapshots.get(&Collection::Services).await {
            Some(Snapshot::Services(rows)) => rows,
            _ => Vec::new(),
        }
    }

    /// Last-good slides snapshot (empty if never loaded).
    pub async fn slides(&self) -> Vec<Slide> {
        match self.snapshots.get(&Collection::Slides).await {
            Some(Snapshot::Slides(rows)) => rows,
            _ => Vec::new(),
        }
    }

    /// Last-good posts snapshot (empty if never loaded).
    pub async fn posts(&self) -> Vec<Post> {
        match self.snapshots.get(&Collection::Posts).await {
            Some(Snapshot::Posts(rows)) => rows,
            _ => Vec::new(),
        }
    }

    /// Last-good applications snapshot (empty if never loaded).
    pub async fn applications(&self) -> Vec<Application> {
        match self.snapshots.get(&Collection::Applications).await {
            Some(Snapshot::Applications(rows)) => rows,
            _ => Vec::new(),
        }
    }

    /// Store a fresh snapshot, or keep the previous one on failure.
    async fn apply(
        &self,
        collection: Collection,
        result: Result<Snapshot, RegistryError>,
        notices: &mut Vec<SyncNotice>,
    ) {
        match result {
            Ok(snapshot) => self.snapshots.insert(collection, snapshot).await,
            Err(error) => {
                tracing::warn!(
                    collection = collection.name(),
                    error = %error,
                    "Collection fetch failed; keeping last-good snapshot"
                );
                notices.push(SyncNotice::for_error(collection, &error));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Stub {
        services: Mutex<Vec<ServicePricing>>,
        fail_services: AtomicBool,
        services_calls: AtomicUsize,
        slides_calls: AtomicUsize,
        posts_calls: AtomicUsize,
        applications_calls: AtomicUsize,
    }

    impl Stub {
        fn set_services(&self, rows: Vec<ServicePricing>) {
            *self.services.lock().unwrap() = rows;
        }
    }

    impl RemoteCollections for Arc<Stub> {
        async fn fetch_services(&self) -> Result<Vec<ServicePricing>, RegistryError> {
            self.services_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_services.load(Ordering::SeqCst) {
                return Err(RegistryError::Timeout);
            }
            Ok(self.services.lock().unwrap().clone())
        }

        async fn fetch_slides(&self) -> Result<Vec<Slide>, RegistryError> {
            self.slides_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn fetch_posts(&self) -> Result<Vec<Post>, RegistryError> {
            self.posts_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn fetch_applications(&self, _token: &str) -> Result<Vec<Application>, RegistryError> {
            self.applications_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn pricing(id: &str, price: &str) -> ServicePricing {
        ServicePricing {
            id: id.to_string(),
            price: price.to_string(),
            original_price: None,
        }
    }

    #[tokio::test]
    async fn test_sync_all_fetches_every_collection_once() {
        let stub = Arc::new(Stub::default());
        stub.set_services(vec![pricing("company", "55000")]);
        let controller = SyncController::new(Arc::clone(&stub));

        let notices = controller.sync_all("token").await;

        assert!(notices.is_empty());
        assert_eq!(stub.services_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.slides_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.posts_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.applications_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.services().await.len(), 1);
    }

    #[tokio::test]
    async fn test_accessor_empty_before_first_sync() {
        let controller = SyncController::new(Arc::new(Stub::default()));
        assert!(controller.services().await.is_empty());
        assert!(controller.posts().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_last_good_snapshot() {
        let stub = Arc::new(Stub::default());
        stub.set_services(vec![pricing("company", "55000")]);
        let controller = SyncController::new(Arc::clone(&stub));

        let notices = controller.sync_public().await;
        assert!(notices.is_empty());

        stub.fail_services.store(true, Ordering::SeqCst);
        let notices = controller.sync_public().await;

        // Stale-but-available: the old snapshot survives the failure.
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.first().unwrap().collection, Collection::Services);
        let services = controller.services().await;
        assert_eq!(services.len(), 1);
        assert_eq!(services.first().unwrap().price, "55000");
    }

    #[tokio::test]
    async fn test_failed_first_fetch_yields_empty_and_notice() {
        let stub = Arc::new(Stub::default());
        stub.fail_services.store(true, Ordering::SeqCst);
        let controller = SyncController::new(Arc::clone(&stub));

        let notices = controller.sync_public().await;

        assert_eq!(notices.len(), 1);
        assert!(controller.services().await.is_empty());
    }

    #[tokio::test]
    async fn test_resync_reflects_mutation() {
        let stub = Arc::new(Stub::default());
        stub.set_services(vec![pricing("company", "55000")]);
        let controller = SyncController::new(Arc::clone(&stub));
        controller.sync_public().await;

        // The mutation happened remotely; the re-fetch must pick it up.
        stub.set_services(vec![pricing("company", "60000")]);
        let notices = controller.resync(Collection::Services, None).await;

        assert!(notices.is_empty());
        let services = controller.services().await;
        assert_eq!(services.first().unwrap().price, "60000");
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let stub = Arc::new(Stub::default());
        stub.set_services(vec![pricing("company", "60000")]);
        let controller = SyncController::new(Arc::clone(&stub));

        controller.resync(Collection::Services, None).await;
        controller.resync(Collection::Services, None).await;

        let services = controller.services().await;
        assert_eq!(services.len(), 1);
        assert_eq!(services.first().unwrap().price, "60000");
        assert_eq!(stub.services_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_applications_resync_without_token_is_skipped() {
        let stub = Arc::new(Stub::default());
        let controller = SyncController::new(Arc::clone(&stub));

        controller.resync(Collection::Applications, None).await;

        assert_eq!(stub.applications_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_notice_names_the_timeout() {
        let stub = Arc::new(Stub::default());
        stub.fail_services.store(true, Ordering::SeqCst);
        let controller = SyncController::new(Arc::clone(&stub));

        let notices = controller.sync_public().await;

        assert!(notices.first().unwrap().message.contains("timed out"));
    }
}
