//! Client-side shell behaviors for the gwadmpaw progressive web app.
//!
//! Three independent components that share no runtime state and talk to
//! each other only through the document, preference storage, and cache
//! storage they are handed:
//!
//! - [`theme`]: light/dark theme toggle persisted to durable storage.
//! - [`sidebar`]: collapsible navigation panel with touch-swipe support
//!   and responsive behavior at the mobile breakpoint.
//! - [`worker`]: versioned offline cache with an install/activate/fetch
//!   lifecycle and an offline document fallback.
//!
//! Controllers operate on the headless document model in [`dom`], and
//! the cache worker runs over injected storage and network capabilities,
//! so every behavior is testable without a browser.

pub mod dom;
pub mod sidebar;
pub mod theme;
pub mod worker;
