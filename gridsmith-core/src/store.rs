//! Canonical element list and single selection.
//!
//! [`ElementStore`] is the only owner of live element state. Every mutating
//! method returns the resulting list so callers can feed it straight into
//! [`HistoryEngine::commit`](crate::HistoryEngine::commit).
//!
//! # Example
//!
//! ```
//! use gridsmith_core::{ElementKind, ElementStore, HistoryEngine};
//!
//! let mut store = ElementStore::new();
//! let mut history = HistoryEngine::new();
//!
//! let button = store.create(ElementKind::Button, 37.0, 52.0);
//! let elements = store.add(button).unwrap();
//! history.commit(elements);
//! assert_eq!(store.all().len(), 1);
//! ```

use std::collections::HashSet;

use crate::element::snap_to_grid;
use crate::{CoreError, CoreResult, Element, ElementId, ElementKind, ElementPatch};

/// Default placement grid in pixels.
pub const DEFAULT_GRID_QUANTUM: f64 = 20.0;

/// The element list plus the current selection.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Vec<Element>,
    selected: Option<ElementId>,
    grid_quantum: f64,
}

impl ElementStore {
    /// Create an empty store snapping to the default grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grid_quantum(DEFAULT_GRID_QUANTUM)
    }

    /// Create an empty store snapping to a custom grid.
    #[must_use]
    pub fn with_grid_quantum(grid_quantum: f64) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            grid_quantum,
        }
    }

    /// Build a new element at a grid-snapped position.
    ///
    /// The element is not inserted; pass it to [`add`](Self::add).
    #[must_use]
    pub fn create(&self, kind: ElementKind, x: f64, y: f64) -> Element {
        Element::new(kind).with_position(
            snap_to_grid(x, self.grid_quantum),
            snap_to_grid(y, self.grid_quantum),
        )
    }

    /// Append an element.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateElement`] if the id is already present;
    /// the list is left unchanged.
    pub fn add(&mut self, element: Element) -> CoreResult<&[Element]> {
        if self.contains(&element.id) {
            tracing::warn!("Rejected duplicate element id {}", element.id);
            return Err(CoreError::DuplicateElement(element.id));
        }
        tracing::debug!("Added {} element {}", element.kind, element.id);
        self.elements.push(element);
        Ok(&self.elements)
    }

    /// Shallow-merge `patch` into the element with `id`.
    ///
    /// An unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPatch`] if a patched value does not fit the
    /// schema; the element is left unchanged.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> CoreResult<&[Element]> {
        if let Some(index) = self.index_of(id) {
            let merged =
                self.elements[index]
                    .merged(patch)
                    .map_err(|e| CoreError::InvalidPatch {
                        id: id.clone(),
                        reason: e.to_string(),
                    })?;
            self.elements[index] = merged;
        }
        Ok(&self.elements)
    }

    /// Remove the element with `id`, clearing the selection if it pointed there.
    pub fn delete(&mut self, id: &ElementId) -> &[Element] {
        self.elements.retain(|e| &e.id != id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        &self.elements
    }

    /// Select an element. Unknown ids leave nothing selected.
    pub fn select(&mut self, id: &ElementId) {
        self.selected = self.contains(id).then(|| id.clone());
    }

    /// Deselect.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replace all elements.
    ///
    /// Duplicate ids keep their first occurrence. The selection is cleared if
    /// its element is gone.
    pub fn set_all(&mut self, elements: Vec<Element>) -> &[Element] {
        let mut seen = HashSet::with_capacity(elements.len());
        let before = elements.len();
        self.elements = elements
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        if self.elements.len() != before {
            tracing::warn!(
                "Dropped {} elements with duplicate ids",
                before - self.elements.len()
            );
        }
        if self.selected.as_ref().is_some_and(|id| !self.contains(id)) {
            self.selected = None;
        }
        &self.elements
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Element] {
        &self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// The selected id, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// Find the topmost element at the given page coordinates.
    ///
    /// Highest z-index wins; ties go to the later element.
    #[must_use]
    pub fn element_at(&self, x: f64, y: f64) -> Option<&Element> {
        self.elements
            .iter()
            .filter(|e| e.contains_point(x, y))
            .max_by_key(|e| e.z_index)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Grid quantum used by [`create`](Self::create).
    #[must_use]
    pub const fn grid_quantum(&self) -> f64 {
        self.grid_quantum
    }

    fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
