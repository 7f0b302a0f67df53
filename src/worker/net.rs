//! Network capability the worker fetches through.
//!
//! [`HttpNetwork`] is the real implementation over reqwest;
//! [`StaticNetwork`] is a scriptable fake for deterministic tests,
//! including an offline mode.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::error::NetworkError;
use super::request::{Request, Response, ResponseKind};

/// HTTP request timeout in seconds.
/// The platform's own network timeout is what a hung request waits on;
/// this bound only keeps the client from waiting forever on top of it.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Performs the actual network request for a fetch interception.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}

/// Network over a shared HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
    origin: String,
}

impl HttpNetwork {
    /// Create a network rooted at the page origin,
    /// e.g. `https://app.example.com`. Relative request URLs are
    /// resolved against it, and responses from it are classified as
    /// same-origin ("basic").
    pub fn new(origin: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            origin: origin.into().trim_end_matches('/').to_string(),
        })
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        let url = self.absolute_url(&request.url);
        let kind = if url.starts_with(&self.origin) {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        debug!(url = %url, "network fetch");
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(Response::new(status, kind, body))
    }
}

/// Scriptable in-memory network.
///
/// Routes map URLs to canned responses; unrouted URLs yield 404 so the
/// non-cacheable path is easy to exercise. Flipping `set_offline` makes
/// every fetch fail the way a disconnected device would.
#[derive(Debug, Default)]
pub struct StaticNetwork {
    routes: Mutex<HashMap<String, Response>>,
    requested: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl StaticNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned response for a URL.
    pub fn route(&self, url: &str, response: Response) {
        self.lock_routes().insert(url.to_string(), response);
    }

    /// Builder form of [`route`](Self::route).
    pub fn with_route(self, url: &str, response: Response) -> Self {
        self.route(url, response);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// URLs fetched so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_routes(&self) -> std::sync::MutexGuard<'_, HashMap<String, Response>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Network for StaticNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Offline);
        }
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.url.clone());
        Ok(self
            .lock_routes()
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, ResponseKind::Basic, "")))
    }
}

// ============================================================================
// Tests
// ============================================================================
