//! Scroll containment for the sidebar's navigation list.
//!
//! Vertical scrolling inside the list must not move the page behind it,
//! except when the list is already at its own boundary and the gesture
//! keeps pulling past it, in which case the page may take over.

use crate::dom::ScrollMetrics;

/// Vertical movement below this is a tap or incidental jitter,
/// not a scroll (px)
const SCROLL_INTENT_THRESHOLD: f64 = 5.0;

/// Whether a touch move inside the nav list may reach the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    Propagate,
    Contain,
}

/// Per-gesture state for scroll containment.
#[derive(Debug, Default)]
pub struct ScrollGuard {
    start_y: f64,
    scrolling: bool,
}

impl ScrollGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, y: f64) {
        self.start_y = y;
        self.scrolling = false;
    }

    /// Decide whether this move may propagate to the page.
    ///
    /// Moves under the intent threshold always propagate. Once the
    /// gesture is a scroll, it is contained unless the list is at its
    /// top and the finger pulls down, or at its bottom and the finger
    /// pushes up.
    pub fn touch_move(&mut self, y: f64, list: ScrollMetrics) -> ScrollDecision {
        if !self.scrolling {
            if (y - self.start_y).abs() <= SCROLL_INTENT_THRESHOLD {
                return ScrollDecision::Propagate;
            }
            self.scrolling = true;
        }

        let pulling_down = y > self.start_y;
        let pushing_up = y < self.start_y;
        if (list.at_top() && pulling_down) || (list.at_bottom() && pushing_up) {
            ScrollDecision::Propagate
        } else {
            ScrollDecision::Contain
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
