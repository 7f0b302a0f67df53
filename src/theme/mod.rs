//! Light/dark theme toggle.
//!
//! Reads the persisted preference on attach (default light), applies it
//! as a document-level attribute, and renders the matching icon glyph.
//! Each toggle flips the theme, persists it, and updates the icon.

pub mod store;

pub use store::{JsonFileStore, MemoryStore, PreferenceStore};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::{Document, ElementRef};

/// Storage key for the persisted theme preference
pub const THEME_KEY: &str = "theme";

/// Document attribute the active theme is applied to
const THEME_ATTRIBUTE: &str = "data-theme";

/// Id of the toggle control in the hosting page
const TOGGLE_ID: &str = "theme-toggle";

/// Class of the icon glyph inside the toggle, with the navbar fallback
const ICON_CLASS: &str = "theme-icon";
const ICON_FALLBACK_CLASS: &str = "navbar-icon";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon shown on the toggle: the glyph invites switching away from
    /// the current theme (moon while light, sun while dark).
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// Controller for the theme toggle.
///
/// Holds its own state rather than reading globals, so independent
/// instances can be attached to independent documents in tests.
pub struct ThemeController<S: PreferenceStore> {
    document: Document,
    store: S,
    icon: Option<ElementRef>,
    theme: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Attach to the document's toggle control. Returns `None` when the
    /// control is absent; the page simply has no theme toggle and the
    /// controller degrades to nothing.
    pub fn attach(document: &Document, store: S) -> Option<Self> {
        let Some(toggle) = document.element(TOGGLE_ID) else {
            debug!(element = TOGGLE_ID, "theme toggle not present, theme controller disabled");
            return None;
        };

        let icon = toggle
            .descendant_with_class(ICON_CLASS)
            .or_else(|| toggle.descendant_with_class(ICON_FALLBACK_CLASS));

        // Unrecognized stored values behave as the default
        let theme = store
            .get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let controller = Self {
            document: document.clone(),
            store,
            icon,
            theme,
        };
        controller.apply();
        Some(controller)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip the theme, persist it, and update attribute and icon.
    /// A failed store write is logged but never blocks the UI change.
    pub fn toggle(&mut self) {
        self.theme = self.theme.opposite();
        self.apply();
        if let Err(e) = self.store.set(THEME_KEY, self.theme.as_str()) {
            warn!(error = %e, "failed to persist theme preference");
        }
    }

    /// Release element handles. The applied theme stays on the document.
    pub fn detach(self) {}

    fn apply(&self) {
        self.document
            .set_attribute(THEME_ATTRIBUTE, self.theme.as_str());
        if let Some(ref icon) = self.icon {
            icon.set_text(self.theme.icon());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
