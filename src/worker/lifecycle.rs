//! Cache worker lifecycle: install, activate, fetch interception.
//!
//! Install opens the versioned bucket and pre-populates it with the
//! essential URL manifest (best-effort). Activate purges every bucket
//! whose name is not the current version. Fetch interception serves
//! cache-first with lazy population, bypassing a fixed set of dynamic
//! paths, and falls back to the cached root document when a navigation
//! fails offline.

use futures::future::join_all;
use tracing::{debug, warn};

use super::error::{CacheError, NetworkError};
use super::net::Network;
use super::request::{Destination, Request, Response};
use super::storage::{CacheBucket, CacheStorage};

/// Current cache bucket name. Bumped with every release so stale
/// buckets are purged on activate.
pub const CACHE_VERSION: &str = "gwadmpaw-v1.16.1";

/// Essential URLs pre-populated at install: enough to render the app
/// shell offline.
pub const PRECACHE_MANIFEST: [&str; 5] = [
    "/",
    "/static/css/style.css",
    "/static/js/theme.js",
    "/static/js/sidebar.js",
    "/static/manifest.json",
];

/// Requests whose URL contains any of these markers are never served
/// from or written to the cache: API data and auth flows must always
/// hit the network.
const BYPASS_MARKERS: [&str; 4] = ["/api/", "/login", "/logout", "/admin/"];

/// Served to failed document navigations as the generic offline page
const OFFLINE_FALLBACK_URL: &str = "/";

/// How a fetch interception was answered.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Excluded from caching; the host performs the plain network fetch
    Bypass,
    CacheHit(Response),
    Network(Response),
    /// Network failed on a document navigation; cached root served instead
    OfflineFallback(Response),
}

impl FetchOutcome {
    /// The response to hand the page, if this outcome carries one.
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Bypass => None,
            FetchOutcome::CacheHit(r)
            | FetchOutcome::Network(r)
            | FetchOutcome::OfflineFallback(r) => Some(r),
        }
    }
}

pub struct CacheWorker<S, N> {
    version: String,
    manifest: Vec<String>,
    storage: S,
    network: N,
}

impl<S: CacheStorage, N: Network> CacheWorker<S, N> {
    /// Worker for the current release version and standard manifest.
    pub fn new(storage: S, network: N) -> Self {
        Self {
            version: CACHE_VERSION.to_string(),
            manifest: PRECACHE_MANIFEST.iter().map(|u| u.to_string()).collect(),
            storage,
            network,
        }
    }

    /// Override the bucket version (rollout simulations in tests).
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Install: create the versioned bucket and pre-populate the
    /// manifest. Population is best-effort; a URL that fails to fetch
    /// or store is logged and skipped, and install still succeeds.
    /// Only failure to create the bucket itself is surfaced.
    pub async fn install(&self) -> Result<(), CacheError> {
        let bucket = self.storage.open(&self.version).await?;
        debug!(version = %self.version, "installing cache bucket");

        for url in &self.manifest {
            let request = Request::new(url.clone(), Destination::for_url(url));
            match self.network.fetch(&request).await {
                Ok(response) => {
                    if let Err(e) = bucket.put(&request, response).await {
                        warn!(url = %url, error = %e, "precache store failed");
                    }
                }
                Err(e) => warn!(url = %url, error = %e, "precache fetch failed"),
            }
        }
        Ok(())
    }

    /// Activate: delete every bucket whose name is not the current
    /// version. Deletions run concurrently; an individual failure is
    /// logged and the rest proceed.
    pub async fn activate(&self) -> Result<(), CacheError> {
        let names = self.storage.keys().await?;
        let stale: Vec<String> = names.into_iter().filter(|n| *n != self.version).collect();
        if stale.is_empty() {
            return Ok(());
        }

        debug!(version = %self.version, count = stale.len(), "purging stale cache buckets");
        let deletions = stale.iter().map(|name| self.storage.delete(name));
        for (name, result) in stale.iter().zip(join_all(deletions).await) {
            if let Err(e) = result {
                warn!(bucket = %name, error = %e, "failed to delete stale bucket");
            }
        }
        Ok(())
    }

    /// Fetch interception: cache-first with lazy population.
    ///
    /// Storage faults never fail a fetch; they degrade to network-only
    /// behavior. A network failure on a document navigation falls back
    /// to the cached root page; any other failure is surfaced unchanged.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome, NetworkError> {
        if should_bypass(&request.url) {
            debug!(url = %request.url, "bypassing cache");
            return Ok(FetchOutcome::Bypass);
        }

        let bucket = match self.storage.open(&self.version).await {
            Ok(bucket) => Some(bucket),
            Err(e) => {
                warn!(error = %e, "cache unavailable, falling through to network");
                None
            }
        };

        if let Some(ref bucket) = bucket {
            match bucket.lookup(request).await {
                Ok(Some(response)) => {
                    debug!(url = %request.url, "cache hit");
                    return Ok(FetchOutcome::CacheHit(response));
                }
                Ok(None) => {}
                Err(e) => warn!(url = %request.url, error = %e, "cache lookup failed"),
            }
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    if let Some(ref bucket) = bucket {
                        // The page gets the response either way; a failed
                        // write only costs the next request a network trip.
                        if let Err(e) = bucket.put(request, response.clone()).await {
                            warn!(url = %request.url, error = %e, "cache store failed");
                        }
                    }
                }
                Ok(FetchOutcome::Network(response))
            }
            Err(err) => {
                if request.destination == Destination::Document {
                    if let Some(ref bucket) = bucket {
                        let fallback = Request::document(OFFLINE_FALLBACK_URL);
                        match bucket.lookup(&fallback).await {
                            Ok(Some(response)) => {
                                warn!(url = %request.url, "network failed, serving offline page");
                                return Ok(FetchOutcome::OfflineFallback(response));
                            }
                            Ok(None) => {}
                            Err(e) => {
                                warn!(error = %e, "offline fallback lookup failed");
                            }
                        }
                    }
                }
                Err(err)
            }
        }
    }
}

fn should_bypass(url: &str) -> bool {
    BYPASS_MARKERS.iter().any(|marker| url.contains(marker))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::memory::MemoryCacheStorage;
    use crate::worker::net::StaticNetwork;
    use crate::worker::request::ResponseKind;

    /// Route worker logs through the test harness.
    /// Run with RUST_LOG=debug to see lifecycle decisions.
    fn init_logging() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    fn routed_network() -> StaticNetwork {
        let network = StaticNetwork::new();
        for url in PRECACHE_MANIFEST {
            network.route(url, Response::ok(format!("body of {url}").into_bytes()));
        }
        network
    }

    fn worker(
        storage: &MemoryCacheStorage,
        network: StaticNetwork,
    ) -> CacheWorker<MemoryCacheStorage, StaticNetwork> {
        CacheWorker::new(storage.clone(), network)
    }

    #[tokio::test]
    async fn test_install_creates_one_bucket_with_manifest() {
        init_logging();
        let storage = MemoryCacheStorage::new();
        let worker = worker(&storage, routed_network());

        worker.install().await.unwrap();

        assert_eq!(storage.bucket_names(), vec![CACHE_VERSION.to_string()]);
        assert_eq!(storage.entry_count(CACHE_VERSION), PRECACHE_MANIFEST.len());
        for url in PRECACHE_MANIFEST {
            assert!(storage.contains(CACHE_VERSION, url));
        }
    }

    #[tokio::test]
    async fn test_install_survives_network_failure() {
        let storage = MemoryCacheStorage::new();
        let network = StaticNetwork::new();
        network.set_offline(true);
        let worker = worker(&storage, network);

        worker.install().await.unwrap();

        // Bucket exists, just unpopulated
        assert_eq!(storage.bucket_names(), vec![CACHE_VERSION.to_string()]);
        assert_eq!(storage.entry_count(CACHE_VERSION), 0);
    }

    #[tokio::test]
    async fn test_activate_purges_stale_buckets() {
        let storage = MemoryCacheStorage::new();
        storage.insert("gwadmpaw-v1.15.0", "/", Response::ok(""));
        storage.insert("gwadmpaw-v1.16.0", "/", Response::ok(""));
        let worker = worker(&storage, routed_network());

        worker.install().await.unwrap();
        worker.activate().await.unwrap();

        assert_eq!(storage.bucket_names(), vec![CACHE_VERSION.to_string()]);
    }

    #[tokio::test]
    async fn test_activate_on_fresh_install_keeps_single_bucket() {
        let storage = MemoryCacheStorage::new();
        let worker = worker(&storage, routed_network());
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        assert_eq!(storage.bucket_names(), vec![CACHE_VERSION.to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_serves_cache_hit_without_network() {
        let storage = MemoryCacheStorage::new();
        let worker = worker(&storage, routed_network());
        worker.install().await.unwrap();
        let installs = worker.network.requested().len();

        let outcome = worker.handle_fetch(&Request::document("/")).await.unwrap();
        match outcome {
            FetchOutcome::CacheHit(response) => assert_eq!(response.body, "body of /"),
            other => panic!("expected cache hit, got {other:?}"),
        }
        assert_eq!(worker.network.requested().len(), installs);
    }

    #[tokio::test]
    async fn test_fetch_miss_populates_cache() {
        let storage = MemoryCacheStorage::new();
        let network = StaticNetwork::new().with_route("/dashboard", Response::ok("dash"));
        let worker = worker(&storage, network);

        let outcome = worker
            .handle_fetch(&Request::document("/dashboard"))
            .await
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::Network(_)));
        assert!(storage.contains(CACHE_VERSION, "/dashboard"));

        // Second request is answered from cache
        let outcome = worker
            .handle_fetch(&Request::document("/dashboard"))
            .await
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::CacheHit(_)));
    }

    #[tokio::test]
    async fn test_fetch_does_not_cache_non_basic_or_error_responses() {
        let storage = MemoryCacheStorage::new();
        let network = StaticNetwork::new()
            .with_route("/widget", Response::new(200, ResponseKind::Cors, "w"));
        let worker = worker(&storage, network);

        let outcome = worker.handle_fetch(&Request::other("/widget")).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Network(_)));
        assert!(!storage.contains(CACHE_VERSION, "/widget"));

        // Unrouted URL yields 404, also not cached
        let outcome = worker.handle_fetch(&Request::other("/missing")).await.unwrap();
        assert_eq!(outcome.response().unwrap().status, 404);
        assert!(!storage.contains(CACHE_VERSION, "/missing"));
    }

    #[tokio::test]
    async fn test_bypass_paths_never_touch_cache() {
        let storage = MemoryCacheStorage::new();
        let network = StaticNetwork::new()
            .with_route("/admin/users", Response::ok("admin page"));
        let worker = worker(&storage, network);

        for _ in 0..2 {
            let outcome = worker
                .handle_fetch(&Request::document("/admin/users"))
                .await
                .unwrap();
            assert_eq!(outcome, FetchOutcome::Bypass);
        }
        assert!(!storage.contains(CACHE_VERSION, "/admin/users"));
        // Bypass means the worker never fetched either; the host does
        assert!(worker.network.requested().is_empty());

        for url in ["/api/v1/items", "/login", "/logout?next=/"] {
            let outcome = worker.handle_fetch(&Request::other(url)).await.unwrap();
            assert_eq!(outcome, FetchOutcome::Bypass);
        }
    }

    #[tokio::test]
    async fn test_offline_document_falls_back_to_cached_root() {
        init_logging();
        let storage = MemoryCacheStorage::new();
        let network = routed_network();
        let worker = worker(&storage, network);
        worker.install().await.unwrap();

        worker.network.set_offline(true);
        let outcome = worker
            .handle_fetch(&Request::document("/dashboard"))
            .await
            .unwrap();
        match outcome {
            FetchOutcome::OfflineFallback(response) => assert_eq!(response.body, "body of /"),
            other => panic!("expected offline fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_offline_non_document_gets_no_fallback() {
        let storage = MemoryCacheStorage::new();
        let worker = worker(&storage, routed_network());
        worker.install().await.unwrap();

        worker.network.set_offline(true);
        let err = worker
            .handle_fetch(&Request::other("/static/app.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::Offline));
    }

    #[tokio::test]
    async fn test_offline_document_without_cached_root_surfaces_error() {
        let storage = MemoryCacheStorage::new();
        let network = StaticNetwork::new();
        network.set_offline(true);
        let worker = worker(&storage, network);

        let err = worker
            .handle_fetch(&Request::document("/dashboard"))
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::Offline));
    }

    #[tokio::test]
    async fn test_version_bump_supersedes_old_bucket() {
        let storage = MemoryCacheStorage::new();
        let old = CacheWorker::new(storage.clone(), routed_network()).with_version("gwadmpaw-v1.15.0");
        old.install().await.unwrap();

        let new = worker(&storage, routed_network());
        new.install().await.unwrap();
        new.activate().await.unwrap();

        assert_eq!(storage.bucket_names(), vec![CACHE_VERSION.to_string()]);
        assert_eq!(storage.entry_count(CACHE_VERSION), PRECACHE_MANIFEST.len());
    }
}
