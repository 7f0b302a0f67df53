//! Touch-swipe recognition for opening and closing the sidebar.
//!
//! Each gesture is a single start/end sample pair; samples are discarded
//! once the gesture is classified.

/// Minimum horizontal displacement for a swipe (px)
const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Maximum vertical drift for a gesture to still count as horizontal (px)
const MAX_VERTICAL_DRIFT: f64 = 30.0;

/// Opening swipes must start within this distance of the left screen edge (px)
const EDGE_ZONE_WIDTH: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// A recognized sidebar swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Open,
    Close,
}

/// Tracks one in-flight touch interaction.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<TouchPoint>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.start = Some(TouchPoint { x, y });
    }

    /// Classify the completed gesture, consuming the start sample.
    ///
    /// A rightward swipe from the left screen edge opens a closed
    /// sidebar; a leftward swipe anywhere closes an open one. Gestures
    /// with too much vertical drift are vertical scrolls, not swipes.
    pub fn touch_end(&mut self, x: f64, y: f64, sidebar_open: bool) -> Option<Swipe> {
        let start = self.start.take()?;
        let dx = x - start.x;
        let dy = (y - start.y).abs();

        if dy > MAX_VERTICAL_DRIFT {
            return None;
        }

        if dx > MIN_SWIPE_DISTANCE && start.x < EDGE_ZONE_WIDTH && !sidebar_open {
            Some(Swipe::Open)
        } else if dx < -MIN_SWIPE_DISTANCE && sidebar_open {
            Some(Swipe::Close)
        } else {
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
