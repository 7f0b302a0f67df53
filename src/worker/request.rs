//! Request and response types flowing through the cache worker.

use bytes::Bytes;

/// What the page intends to do with the response.
/// Only document requests get the offline fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Destination {
    Document,
    Style,
    Script,
    Manifest,
    #[default]
    Other,
}

impl Destination {
    /// Natural destination for a shell URL, used when the worker
    /// originates the request itself during precache.
    pub fn for_url(url: &str) -> Self {
        if url == "/" {
            Destination::Document
        } else if url.ends_with(".css") {
            Destination::Style
        } else if url.ends_with(".js") {
            Destination::Script
        } else if url.ends_with("manifest.json") {
            Destination::Manifest
        } else {
            Destination::Other
        }
    }
}

/// An outgoing request intercepted from a controlled page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub url: String,
    pub destination: Destination,
}

impl Request {
    pub fn new(url: impl Into<String>, destination: Destination) -> Self {
        Self {
            url: url.into(),
            destination,
        }
    }

    /// A top-level document navigation.
    pub fn document(url: impl Into<String>) -> Self {
        Self::new(url, Destination::Document)
    }

    /// A subresource request with no special destination.
    pub fn other(url: impl Into<String>) -> Self {
        Self::new(url, Destination::Other)
    }
}

/// Origin classification of a response, the subset of the platform's
/// response types the caching decision cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin
    #[default]
    Basic,
    /// Cross-origin, readable
    Cors,
    /// Cross-origin, opaque
    Opaque,
}

/// A response as seen by the worker. The body is shared, so cloning a
/// response for a cache write is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, kind: ResponseKind, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            kind,
            body: body.into(),
        }
    }

    /// A successful same-origin response.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, ResponseKind::Basic, body)
    }

    /// Only successful same-origin responses are stored:
    /// errors, redirects, and cross-origin responses are passed through.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_for_shell_urls() {
        assert_eq!(Destination::for_url("/"), Destination::Document);
        assert_eq!(
            Destination::for_url("/static/css/style.css"),
            Destination::Style
        );
        assert_eq!(
            Destination::for_url("/static/js/sidebar.js"),
            Destination::Script
        );
        assert_eq!(
            Destination::for_url("/static/manifest.json"),
            Destination::Manifest
        );
        assert_eq!(Destination::for_url("/favicon.ico"), Destination::Other);
    }

    #[test]
    fn test_cacheable_requires_200_and_basic() {
        assert!(Response::ok("body").is_cacheable());
        assert!(!Response::new(404, ResponseKind::Basic, "").is_cacheable());
        assert!(!Response::new(301, ResponseKind::Basic, "").is_cacheable());
        assert!(!Response::new(200, ResponseKind::Cors, "").is_cacheable());
        assert!(!Response::new(200, ResponseKind::Opaque, "").is_cacheable());
    }

    #[test]
    fn test_response_clone_shares_body() {
        let response = Response::ok("shared body");
        let copy = response.clone();
        // Bytes clones share the underlying buffer
        assert_eq!(response.body.as_ptr(), copy.body.as_ptr());
    }
}
