//! In-memory cache storage for tests and headless hosts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::error::CacheError;
use super::request::{Request, Response};
use super::storage::{CacheBucket, CacheStorage};

type Buckets = HashMap<String, HashMap<String, Response>>;

/// Deterministic in-memory implementation of [`CacheStorage`].
///
/// Clones share the same underlying buckets, so a bucket handle stays
/// live across a `delete`/`open` of its name the way platform cache
/// handles do.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStorage {
    buckets: Arc<Mutex<Buckets>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket names, for test assertions without going through the trait.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of entries in the named bucket, zero if it does not exist.
    pub fn entry_count(&self, name: &str) -> usize {
        self.lock().get(name).map(|b| b.len()).unwrap_or(0)
    }

    /// Whether the named bucket holds an entry for `url`.
    pub fn contains(&self, name: &str, url: &str) -> bool {
        self.lock()
            .get(name)
            .map(|b| b.contains_key(url))
            .unwrap_or(false)
    }

    /// Pre-populate an entry, creating the bucket if needed.
    pub fn insert(&self, name: &str, url: &str, response: Response) {
        self.lock()
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buckets> {
        // A poisoned lock only means another test thread panicked;
        // the map itself is still usable.
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to one named bucket of a [`MemoryCacheStorage`].
#[derive(Debug, Clone)]
pub struct MemoryBucket {
    name: String,
    buckets: Arc<Mutex<Buckets>>,
}

impl MemoryBucket {
    fn lock(&self) -> std::sync::MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    type Bucket = MemoryBucket;

    async fn open(&self, name: &str) -> Result<Self::Bucket, CacheError> {
        self.lock().entry(name.to_string()).or_default();
        Ok(MemoryBucket {
            name: name.to_string(),
            buckets: Arc::clone(&self.buckets),
        })
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.bucket_names())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.lock().remove(name).is_some())
    }
}

#[async_trait]
impl CacheBucket for MemoryBucket {
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        Ok(self
            .lock()
            .get(&self.name)
            .and_then(|bucket| bucket.get(&request.url))
            .cloned())
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        self.lock()
            .entry(self.name.clone())
            .or_default()
            .insert(request.url.clone(), response);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
