//! Offline cache worker.
//!
//! This module provides the `CacheWorker` with its install → activate →
//! fetch lifecycle over injected cache-storage and network capabilities.
//! One versioned bucket holds the pre-cached app shell plus lazily
//! cached responses; activating a new version purges every other bucket.
//!
//! Dynamic paths (`/api/`, `/login`, `/logout`, `/admin/`) bypass the
//! cache entirely, and failed document navigations fall back to the
//! cached root page.

pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod net;
pub mod request;
pub mod storage;

pub use error::{CacheError, NetworkError};
pub use lifecycle::{CacheWorker, FetchOutcome, CACHE_VERSION, PRECACHE_MANIFEST};
pub use memory::MemoryCacheStorage;
pub use net::{HttpNetwork, Network, StaticNetwork};
pub use request::{Destination, Request, Response, ResponseKind};
pub use storage::{CacheBucket, CacheStorage};
