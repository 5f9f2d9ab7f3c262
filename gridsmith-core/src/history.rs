//! # Undo/Redo History
//!
//! Linear history over immutable snapshots of the full element list.
//!
//! ```text
//! commit(A) commit(B) commit(C)   [ [], A, B, C ]        cursor = 3
//! undo() undo()                   [ [], A, B, C ]        cursor = 1  -> A
//! commit(X)                       [ [], A, X ]           cursor = 2  (B, C dropped)
//! ```
//!
//! The history is bounded; once full, each commit evicts the oldest entry.

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;

use crate::Element;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// An immutable copy of the element list at one point in time.
///
/// Cloning is cheap and never aliases mutable state: later edits to the live
/// store cannot reach a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<[Element]>);

impl Snapshot {
    /// An empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// The elements in this snapshot.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    /// Copy the elements out, e.g. to feed `ElementStore::set_all`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Element> {
        self.0.to_vec()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Snapshot {
    type Target = [Element];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&[Element]> for Snapshot {
    fn from(elements: &[Element]) -> Self {
        Self(Arc::from(elements))
    }
}

impl From<Vec<Element>> for Snapshot {
    fn from(elements: Vec<Element>) -> Self {
        Self(Arc::from(elements))
    }
}

/// Bounded linear undo/redo stack.
#[derive(Debug, Clone)]
pub struct HistoryEngine {
    /// Snapshots, oldest first. Never empty.
    entries: VecDeque<Snapshot>,
    /// Index of the snapshot matching the live state.
    cursor: usize,
    /// Maximum number of entries (oldest evicted when exceeded).
    max_size: usize,
}

impl HistoryEngine {
    /// Create a history holding one empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history with a custom bound. A bound of zero is raised to one.
    #[must_use]
    pub fn with_max_size(max_size: usize) -> Self {
        let mut entries = VecDeque::with_capacity(max_size.max(1));
        entries.push_back(Snapshot::empty());
        Self {
            entries,
            cursor: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record a new state, abandoning any redo branch.
    pub fn commit(&mut self, snapshot: impl Into<Snapshot>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot.into());
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > self.max_size {
            self.entries.pop_front();
            self.cursor -= 1;
        }
        tracing::debug!(
            "History commit: {} entries, cursor {}",
            self.entries.len(),
            self.cursor
        );
    }

    /// Step back one entry. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward one entry. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Replace the whole history with a single entry.
    pub fn reset(&mut self, snapshot: impl Into<Snapshot>) {
        self.entries.clear();
        self.entries.push_back(snapshot.into());
        self.cursor = 0;
    }

    /// Whether [`undo`](Self::undo) would move.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`redo`](Self::redo) would move.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least one snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cursor position.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of snapshots kept.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    fn snapshot_of(ids: &[&str]) -> Snapshot {
        ids.iter()
            .map(|id| Element::new(ElementKind::Div).with_id(*id))
            .collect::<Vec<_>>()
            .into()
    }

    fn ids(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_initial_state() {
        let history = HistoryEngine::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.current().expect("entry").is_empty());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = HistoryEngine::new();
        history.commit(snapshot_of(&["a"]));
        history.commit(snapshot_of(&["a", "b"]));

        let back = history.undo().expect("undo");
        assert_eq!(ids(&back), ["a"]);
        let back = history.undo().expect("undo");
        assert!(back.is_empty());
        assert!(history.undo().is_none());

        let forward = history.redo().expect("redo");
        assert_eq!(ids(&forward), ["a"]);
        let forward = history.redo().expect("redo");
        assert_eq!(ids(&forward), ["a", "b"]);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_undo_drops_branch() {
        let mut history = HistoryEngine::new();
        history.commit(snapshot_of(&["a"]));
        history.commit(snapshot_of(&["a", "b"]));
        history.undo();
        history.commit(snapshot_of(&["x"]));

        assert!(history.redo().is_none());
        assert_eq!(history.len(), 3);
        assert_eq!(ids(history.current().expect("entry")), ["x"]);
    }

    #[test]
    fn test_eviction_keeps_cursor_on_same_entry() {
        let mut history = HistoryEngine::with_max_size(3);
        history.commit(snapshot_of(&["1"]));
        history.commit(snapshot_of(&["2"]));
        history.commit(snapshot_of(&["3"]));

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(ids(history.current().expect("entry")), ["3"]);

        assert_eq!(ids(&history.undo().expect("undo")), ["2"]);
        assert_eq!(ids(&history.undo().expect("undo")), ["1"]);
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_default_bound_is_fifty() {
        let mut history = HistoryEngine::new();
        for i in 0..120 {
            let id = i.to_string();
            history.commit(snapshot_of(&[id.as_str()]));
            assert!(history.len() <= DEFAULT_HISTORY_LIMIT);
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.cursor(), DEFAULT_HISTORY_LIMIT - 1);
    }

    #[test]
    fn test_reset() {
        let mut history = HistoryEngine::new();
        history.commit(snapshot_of(&["a"]));
        history.commit(snapshot_of(&["b"]));
        history.reset(snapshot_of(&["loaded"]));

        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_snapshot_is_independent_of_source() {
        let mut live = vec![Element::new(ElementKind::Div).with_id("a")];
        let snapshot = Snapshot::from(live.as_slice());
        live[0].x = 500.0;
        assert!(snapshot[0].x.abs() < f64::EPSILON);
    }
}
