//! Collapsible navigation sidebar.
//!
//! Two states, `Open` and `Closed`, mirrored to the document as the
//! `active` class on the panel, the overlay, and the toggle button,
//! always the three in lockstep. Opening locks page scroll and dims the
//! page behind the overlay; closing undoes both. On viewports wider
//! than the mobile breakpoint the panel renders inline and the classes
//! are kept off entirely.

pub mod gesture;
pub mod scroll;

pub use gesture::{Swipe, SwipeTracker};
pub use scroll::{ScrollDecision, ScrollGuard};

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

use crate::dom::{Document, ElementRef};

/// Viewport width at or below which the sidebar overlays the page (px)
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Delay before closing after a navigation link click, letting the
/// navigation visually complete first
const LINK_CLOSE_DELAY: Duration = Duration::from_millis(100);

/// Class marking the open state on panel, overlay, and toggle
const ACTIVE_CLASS: &str = "active";

const SIDEBAR_ID: &str = "sidebar";
const TOGGLE_ID: &str = "sidebar-toggle";
const OVERLAY_ID: &str = "sidebar-overlay";
const LINK_CLASS: &str = "sidebar-link";
const NAV_CLASS: &str = "sidebar-nav";

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("required element missing: #{0}")]
    MissingElement(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Open,
    Closed,
}

/// Page events fed to the controller by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SidebarEvent {
    ToggleClick,
    CloseClick,
    OverlayClick,
    /// Activation of a `.sidebar-link` navigation link
    LinkClick,
    Resize { width: f64 },
    TouchStart { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
    /// Touch start inside the panel's navigation list
    NavTouchStart { y: f64 },
    /// Touch move inside the panel's navigation list
    NavTouchMove { y: f64 },
}

/// What the host must do after an event is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing further
    None,
    /// Call [`SidebarController::close`] after the delay
    CloseAfter(Duration),
    /// Whether a nav-list touch move may propagate to the page
    Scroll(ScrollDecision),
}

#[derive(Debug)]
pub struct SidebarController {
    document: Document,
    panel: ElementRef,
    toggle: ElementRef,
    overlay: Option<ElementRef>,
    nav: Option<ElementRef>,
    viewport_width: f64,
    swipe: SwipeTracker,
    scroll_guard: ScrollGuard,
}

impl SidebarController {
    /// Attach to the document. The panel and toggle button are required;
    /// without them the error is logged and no controller is built, so
    /// the page degrades to whatever its stylesheet renders. Close
    /// button, overlay, and nav list are optional.
    ///
    /// On narrow viewports the sidebar starts hidden.
    pub fn attach(document: &Document, viewport_width: f64) -> Result<Self, AttachError> {
        let panel = document.element(SIDEBAR_ID);
        let toggle = document.element(TOGGLE_ID);
        let (Some(panel), Some(toggle)) = (panel, toggle) else {
            error!("sidebar elements not found, sidebar controller disabled");
            let missing = if document.element(SIDEBAR_ID).is_none() {
                SIDEBAR_ID
            } else {
                TOGGLE_ID
            };
            return Err(AttachError::MissingElement(missing));
        };

        let mut controller = Self {
            document: document.clone(),
            overlay: document.element(OVERLAY_ID),
            nav: panel.descendant_with_class(NAV_CLASS),
            panel,
            toggle,
            viewport_width,
            swipe: SwipeTracker::new(),
            scroll_guard: ScrollGuard::new(),
        };

        if controller.is_mobile() {
            controller.close();
        }
        Ok(controller)
    }

    pub fn state(&self) -> SidebarState {
        if self.is_open() {
            SidebarState::Open
        } else {
            SidebarState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        // The panel class is the single source of truth; overlay and
        // toggle classes are mirrored from it on every transition.
        self.panel.has_class(ACTIVE_CLASS)
    }

    pub fn open(&mut self) {
        self.set_active(true);
        self.document.lock_scroll();
        debug!("sidebar opened");
    }

    pub fn close(&mut self) {
        self.set_active(false);
        self.document.unlock_scroll();
        debug!("sidebar closed");
    }

    /// Handle one page event, returning what the host should do next.
    pub fn handle(&mut self, event: SidebarEvent) -> Effect {
        match event {
            SidebarEvent::ToggleClick => {
                if self.is_open() {
                    self.close();
                } else {
                    self.open();
                }
                Effect::None
            }
            SidebarEvent::CloseClick | SidebarEvent::OverlayClick => {
                self.close();
                Effect::None
            }
            SidebarEvent::LinkClick => {
                if self.is_mobile() {
                    Effect::CloseAfter(LINK_CLOSE_DELAY)
                } else {
                    Effect::None
                }
            }
            SidebarEvent::Resize { width } => {
                self.viewport_width = width;
                if !self.is_mobile() {
                    // Desktop renders the panel inline; clear overlay
                    // state regardless of what it was.
                    self.close();
                }
                Effect::None
            }
            SidebarEvent::TouchStart { x, y } => {
                if self.is_mobile() {
                    self.swipe.touch_start(x, y);
                }
                Effect::None
            }
            SidebarEvent::TouchEnd { x, y } => {
                if self.is_mobile() {
                    match self.swipe.touch_end(x, y, self.is_open()) {
                        Some(Swipe::Open) => self.open(),
                        Some(Swipe::Close) => self.close(),
                        None => {}
                    }
                }
                Effect::None
            }
            SidebarEvent::NavTouchStart { y } => {
                self.scroll_guard.touch_start(y);
                Effect::None
            }
            SidebarEvent::NavTouchMove { y } => {
                let Some(ref nav) = self.nav else {
                    // No nav list to contain scrolling for
                    return Effect::Scroll(ScrollDecision::Propagate);
                };
                Effect::Scroll(self.scroll_guard.touch_move(y, nav.scroll()))
            }
        }
    }

    /// Navigation links the host should report [`SidebarEvent::LinkClick`] for.
    pub fn links(&self) -> Vec<ElementRef> {
        self.document.elements_with_class(LINK_CLASS)
    }

    /// Release element handles, leaving the panel closed.
    pub fn detach(mut self) {
        self.close();
    }

    fn is_mobile(&self) -> bool {
        self.viewport_width <= MOBILE_BREAKPOINT
    }

    fn set_active(&self, active: bool) {
        let targets = [Some(&self.panel), Some(&self.toggle), self.overlay.as_ref()];
        for element in targets.into_iter().flatten() {
            if active {
                element.add_class(ACTIVE_CLASS);
            } else {
                element.remove_class(ACTIVE_CLASS);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
