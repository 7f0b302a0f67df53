//! Cache storage capability the worker runs over.
//!
//! Mirrors the platform cache API surface the worker actually uses:
//! named buckets that can be opened, enumerated, and deleted, each
//! holding request/response pairs keyed by URL. The worker is generic
//! over this trait so tests run against [`MemoryCacheStorage`]
//! instead of a real browser cache.
//!
//! [`MemoryCacheStorage`]: super::memory::MemoryCacheStorage

use async_trait::async_trait;

use super::error::CacheError;
use super::request::{Request, Response};

/// A named, versioned collection of stored request/response pairs.
///
/// Entries are keyed by request URL: a document navigation and a
/// subresource fetch for the same URL hit the same entry. Writes to a
/// single key are atomic; concurrent fetch interceptions need no
/// further coordination.
#[async_trait]
pub trait CacheBucket: Send + Sync {
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, CacheError>;

    async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError>;
}

/// The set of named cache buckets available to the worker.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    type Bucket: CacheBucket;

    /// Open the bucket with the given name, creating it if absent.
    async fn open(&self, name: &str) -> Result<Self::Bucket, CacheError>;

    /// Names of all existing buckets.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a bucket wholesale. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;
}
