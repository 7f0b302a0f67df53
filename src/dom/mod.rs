//! Headless document model the UI controllers operate on.
//!
//! This module provides a small stand-in for the parts of a browser
//! document the shell touches: elements addressed by id, class lists,
//! text content, document-level attributes, a body scroll lock, and
//! per-element scroll metrics for the sidebar's navigation list.
//!
//! A [`Document`] is a cheaply clonable handle; controllers and tests
//! share one and observe each other's mutations, matching the
//! single-threaded event-loop model of the page.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Scroll position of a scrollable element, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }

    /// Browsers report fractional scroll positions, so "at bottom" allows
    /// a 1px tolerance rather than requiring exact equality.
    pub fn at_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - 1.0
    }
}

#[derive(Debug, Default)]
struct ElementData {
    id: Option<String>,
    parent: Option<usize>,
    classes: BTreeSet<String>,
    text: String,
    scroll: ScrollMetrics,
}

#[derive(Debug, Default)]
struct DocumentInner {
    elements: Vec<ElementData>,
    by_id: HashMap<String, usize>,
    attributes: HashMap<String, String>,
    scroll_locked: bool,
}

/// Shared handle to a headless document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a top-level element registered under `id`.
    /// Re-using an id replaces the registration, as a browser would
    /// resolve only one of the duplicates.
    pub fn create_element(&self, id: &str) -> ElementRef {
        let mut inner = self.inner.borrow_mut();
        let index = inner.elements.len();
        inner.elements.push(ElementData {
            id: Some(id.to_string()),
            ..ElementData::default()
        });
        inner.by_id.insert(id.to_string(), index);
        self.element_ref(index)
    }

    /// Create a top-level element with no id, addressable only by class.
    pub fn create_unnamed(&self) -> ElementRef {
        let mut inner = self.inner.borrow_mut();
        let index = inner.elements.len();
        inner.elements.push(ElementData::default());
        self.element_ref(index)
    }

    pub fn element(&self, id: &str) -> Option<ElementRef> {
        let index = *self.inner.borrow().by_id.get(id)?;
        Some(self.element_ref(index))
    }

    /// All elements carrying `class`, in insertion order.
    pub fn elements_with_class(&self, class: &str) -> Vec<ElementRef> {
        let inner = self.inner.borrow();
        inner
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.classes.contains(class))
            .map(|(i, _)| self.element_ref(i))
            .collect()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Suppress page scrolling (the `body { overflow: hidden }` analog).
    pub fn lock_scroll(&self) {
        self.inner.borrow_mut().scroll_locked = true;
    }

    pub fn unlock_scroll(&self) {
        self.inner.borrow_mut().scroll_locked = false;
    }

    pub fn scroll_locked(&self) -> bool {
        self.inner.borrow().scroll_locked
    }

    fn element_ref(&self, index: usize) -> ElementRef {
        ElementRef {
            document: self.clone(),
            index,
        }
    }
}

/// Handle to one element of a [`Document`].
#[derive(Debug, Clone)]
pub struct ElementRef {
    document: Document,
    index: usize,
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.document.inner, &other.document.inner) && self.index == other.index
    }
}

impl ElementRef {
    pub fn id(&self) -> Option<String> {
        self.document.inner.borrow().elements[self.index].id.clone()
    }

    /// Create a child element with the given classes, returning its handle.
    pub fn append_child(&self, classes: &[&str]) -> ElementRef {
        let mut inner = self.document.inner.borrow_mut();
        let index = inner.elements.len();
        inner.elements.push(ElementData {
            parent: Some(self.index),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..ElementData::default()
        });
        drop(inner);
        self.document.element_ref(index)
    }

    pub fn add_class(&self, class: &str) {
        self.document.inner.borrow_mut().elements[self.index]
            .classes
            .insert(class.to_string());
    }

    pub fn remove_class(&self, class: &str) {
        self.document.inner.borrow_mut().elements[self.index]
            .classes
            .remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.document.inner.borrow().elements[self.index]
            .classes
            .contains(class)
    }

    pub fn set_text(&self, text: &str) {
        self.document.inner.borrow_mut().elements[self.index].text = text.to_string();
    }

    pub fn text(&self) -> String {
        self.document.inner.borrow().elements[self.index].text.clone()
    }

    /// First descendant carrying `class` (the `querySelector` analog).
    pub fn descendant_with_class(&self, class: &str) -> Option<ElementRef> {
        let inner = self.document.inner.borrow();
        let found = inner.elements.iter().position(|element| {
            if !element.classes.contains(class) {
                return false;
            }
            // Walk the parent chain to see if this element sits under us.
            let mut parent = element.parent;
            while let Some(p) = parent {
                if p == self.index {
                    return true;
                }
                parent = inner.elements[p].parent;
            }
            false
        });
        drop(inner);
        found.map(|i| self.document.element_ref(i))
    }

    pub fn scroll(&self) -> ScrollMetrics {
        self.document.inner.borrow().elements[self.index].scroll
    }

    pub fn set_scroll(&self, metrics: ScrollMetrics) {
        self.document.inner.borrow_mut().elements[self.index].scroll = metrics;
    }
}

// ============================================================================
// Tests
// ============================================================================
