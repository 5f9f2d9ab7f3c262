//! Editor session: the composition root wiring store, history, compiler and
//! serializer together.

use crate::project::{Project, ProjectSerializer, COLUMN_RANGE, DEFAULT_COLUMNS};
use crate::storage::{KeyValueStore, MemoryStore, PROJECT_KEY};
use crate::store::DEFAULT_GRID_QUANTUM;
use crate::{
    CompiledStyle, CoreError, CoreResult, Element, ElementId, ElementKind, ElementPatch,
    ElementStore, HistoryEngine, ReadError, StorageError, StyleCompiler, DEFAULT_HISTORY_LIMIT,
};

/// Editor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Placement grid in pixels.
    pub grid_quantum: f64,
    /// Maximum number of history entries.
    pub history_limit: usize,
    /// Key the current project is persisted under.
    pub storage_key: String,
    /// Initial grid column count.
    pub columns: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_quantum: DEFAULT_GRID_QUANTUM,
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage_key: PROJECT_KEY.to_string(),
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// Keyboard-level commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    /// Step back in history.
    Undo,
    /// Step forward in history.
    Redo,
    /// Delete the selected element.
    DeleteSelected,
    /// Deselect.
    ClearSelection,
    /// Package the project for download.
    Save,
    /// Ask the host to pick a project file.
    Open,
}

/// What a command did, so the host knows what to re-render or trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Elements or selection changed.
    Changed,
    /// Nothing happened.
    Unchanged,
    /// A project payload ready to hand to the host.
    Saved(Project),
    /// The host should read a file and call [`Editor::open_result`].
    OpenRequested,
}

/// A single editing session.
///
/// Mutations that should be undoable go through [`commit`](Self::commit);
/// [`preview`](Self::preview) and [`edit_property`](Self::edit_property) only
/// touch the live state until then.
#[derive(Debug)]
pub struct Editor {
    store: ElementStore,
    history: HistoryEngine,
    compiler: StyleCompiler,
    serializer: ProjectSerializer,
    columns: u8,
    uncommitted: bool,
    storage_error: Option<StorageError>,
}

impl Editor {
    /// Create an editor persisting to `storage`.
    #[must_use]
    pub fn new(config: EditorConfig, storage: Box<dyn KeyValueStore>) -> Self {
        let columns = if COLUMN_RANGE.contains(&config.columns) {
            config.columns
        } else {
            tracing::warn!(
                "Column count {} out of range, using {DEFAULT_COLUMNS}",
                config.columns
            );
            DEFAULT_COLUMNS
        };
        Self {
            store: ElementStore::with_grid_quantum(config.grid_quantum),
            history: HistoryEngine::with_max_size(config.history_limit),
            compiler: StyleCompiler::new(),
            serializer: ProjectSerializer::with_key(storage, config.storage_key),
            columns,
            uncommitted: false,
            storage_error: None,
        }
    }

    /// Create an editor with default settings and in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(EditorConfig::default(), Box::new(MemoryStore::new()))
    }

    /// Load the persisted project, if there is one. Returns whether it did.
    pub fn restore(&mut self) -> bool {
        match self.serializer.restore() {
            Some(project) => {
                self.apply(&project);
                true
            }
            None => false,
        }
    }

    /// Create an element at a grid-snapped position, select it and commit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateElement`] if the generated id collides.
    pub fn create_element(&mut self, kind: ElementKind, x: f64, y: f64) -> CoreResult<ElementId> {
        let element = self.store.create(kind, x, y);
        let id = element.id.clone();
        self.add_element(element)?;
        Ok(id)
    }

    /// Insert a prepared element, select it and commit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateElement`] if the id is already present.
    pub fn add_element(&mut self, element: Element) -> CoreResult<()> {
        let id = element.id.clone();
        self.store.add(element)?;
        self.store.select(&id);
        self.commit();
        Ok(())
    }

    /// Apply a live update during a drag or resize, without committing.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPatch`] if the patch does not fit.
    pub fn preview(&mut self, id: &ElementId, patch: &ElementPatch) -> CoreResult<()> {
        if self.store.get(id).is_none() {
            tracing::debug!("Ignoring update for unknown element {id}");
            return Ok(());
        }
        self.store.update(id, patch)?;
        self.uncommitted = true;
        Ok(())
    }

    /// End a drag or resize. Commits once if anything moved.
    pub fn finish_gesture(&mut self) -> bool {
        if self.uncommitted {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Apply a property-panel edit. The caller decides when to
    /// [`commit`](Self::commit), usually via a
    /// [`CommitDebouncer`](crate::CommitDebouncer).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPatch`] if the patch does not fit.
    pub fn edit_property(&mut self, id: &ElementId, patch: &ElementPatch) -> CoreResult<()> {
        self.preview(id, patch)
    }

    /// Record the live state in history and persist it.
    pub fn commit(&mut self) {
        self.history.commit(self.store.all());
        self.uncommitted = false;
        self.persist();
    }

    /// Whether live edits are waiting for a commit.
    #[must_use]
    pub const fn has_uncommitted_changes(&self) -> bool {
        self.uncommitted
    }

    /// Select an element. Unknown ids leave nothing selected.
    pub fn select(&mut self, id: &ElementId) {
        self.store.select(id);
    }

    /// Select the topmost element at page coordinates, or deselect.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<ElementId> {
        let hit = self.store.element_at(x, y).map(|e| e.id.clone());
        match &hit {
            Some(id) => self.store.select(id),
            None => self.store.clear_selection(),
        }
        hit
    }

    /// Deselect.
    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Delete the selected element and commit. Returns whether anything was
    /// deleted.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.store.selected_id().cloned() else {
            return false;
        };
        self.store.delete(&id);
        self.commit();
        true
    }

    /// Step back in history. Pending live edits are committed first.
    pub fn undo(&mut self) -> bool {
        if self.uncommitted {
            self.commit();
        }
        match self.history.undo() {
            Some(snapshot) => {
                self.store.set_all(snapshot.to_vec());
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Step forward in history.
    pub fn redo(&mut self) -> bool {
        if self.uncommitted {
            return false;
        }
        match self.history.redo() {
            Some(snapshot) => {
                self.store.set_all(snapshot.to_vec());
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Change the page grid column count.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColumns`] outside `1..=12`.
    pub fn set_columns(&mut self, columns: u32) -> CoreResult<()> {
        let columns = u8::try_from(columns)
            .ok()
            .filter(|c| COLUMN_RANGE.contains(c))
            .ok_or(CoreError::InvalidColumns(columns))?;
        self.columns = columns;
        self.persist();
        Ok(())
    }

    /// Package the current state.
    #[must_use]
    pub fn save(&self) -> Project {
        ProjectSerializer::save(self.store.all(), self.columns)
    }

    /// Finish an external file read started after [`EditorCommand::Open`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Read`] or [`CoreError::Validation`]; the current
    /// state is left untouched in both cases. Persistence failures after a
    /// successful load are kept for [`take_storage_error`](Self::take_storage_error).
    pub fn open_result(&mut self, result: Result<String, std::io::Error>) -> CoreResult<()> {
        let text = result.map_err(ReadError::from)?;
        let project = ProjectSerializer::parse(&text)?;
        self.apply(&project);
        Ok(())
    }

    /// Run a keyboard command.
    pub fn dispatch(&mut self, command: EditorCommand) -> CommandOutcome {
        let changed = match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::ClearSelection => {
                let had_selection = self.store.selected_id().is_some();
                self.store.clear_selection();
                had_selection
            }
            EditorCommand::Save => return CommandOutcome::Saved(self.save()),
            EditorCommand::Open => return CommandOutcome::OpenRequested,
        };
        if changed {
            CommandOutcome::Changed
        } else {
            CommandOutcome::Unchanged
        }
    }

    /// Compile the style of one element.
    #[must_use]
    pub fn style_of(&self, id: &ElementId) -> Option<CompiledStyle> {
        self.store.get(id).map(|e| self.compiler.compile(e))
    }

    /// Take the most recent persistence failure, if any.
    pub fn take_storage_error(&mut self) -> Option<StorageError> {
        self.storage_error.take()
    }

    /// The element store.
    #[must_use]
    pub const fn store(&self) -> &ElementStore {
        &self.store
    }

    /// The history engine.
    #[must_use]
    pub const fn history(&self) -> &HistoryEngine {
        &self.history
    }

    /// All elements.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.store.all()
    }

    /// The selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.store.selected()
    }

    /// Current column count.
    #[must_use]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    fn apply(&mut self, project: &Project) {
        self.uncommitted = false;
        self.columns = project.columns;
        if let Err(e) = self
            .serializer
            .load(project, &mut self.store, &mut self.history)
        {
            self.storage_error = Some(e);
        }
    }

    fn persist(&mut self) {
        let project = self.save();
        if let Err(e) = self.serializer.persist(&project) {
            self.storage_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_create_selects_and_commits() {
        let mut editor = Editor::in_memory();
        let id = editor
            .create_element(ElementKind::Button, 37.0, 52.0)
            .expect("create");
        assert_eq!(editor.selected().map(|e| &e.id), Some(&id));
        assert_eq!(editor.history().len(), 2);
        assert!(editor.history().can_undo());
    }

    #[test]
    fn test_gesture_commits_once() {
        let mut editor = Editor::in_memory();
        let id = editor
            .create_element(ElementKind::Card, 0.0, 0.0)
            .expect("create");
        for step in 1..=10 {
            let patch = ElementPatch::new().set("x", step * 5);
            editor.preview(&id, &patch).expect("preview");
        }
        assert_eq!(editor.history().len(), 2);
        assert!(editor.finish_gesture());
        assert!(!editor.finish_gesture());
        assert_eq!(editor.history().len(), 3);

        assert!(editor.undo());
        let card = editor.store().get(&id).expect("card");
        assert!(card.x.abs() < f64::EPSILON);
    }

    #[test]
    fn test_preview_of_unknown_id_leaves_nothing_to_commit() {
        let mut editor = Editor::in_memory();
        editor
            .create_element(ElementKind::Div, 0.0, 0.0)
            .expect("create");
        let patch = ElementPatch::new().set("x", 80);
        editor
            .preview(&ElementId::from("missing"), &patch)
            .expect("preview");

        assert!(!editor.has_uncommitted_changes());
        assert!(!editor.finish_gesture());
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_undo_commits_pending_edit_first() {
        let mut editor = Editor::in_memory();
        let id = editor
            .create_element(ElementKind::Text, 0.0, 0.0)
            .expect("create");
        editor
            .edit_property(&id, &ElementPatch::new().set("fontSize", 24))
            .expect("edit");

        assert!(editor.undo());
        let text = editor.store().get(&id).expect("text");
        assert!((text.font_size - 16.0).abs() < f64::EPSILON);
        assert!(editor.redo());
        let text = editor.store().get(&id).expect("text");
        assert!((text.font_size - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dispatch_outcomes() {
        let mut editor = Editor::in_memory();
        assert_eq!(editor.dispatch(EditorCommand::Undo), CommandOutcome::Unchanged);
        assert_eq!(
            editor.dispatch(EditorCommand::DeleteSelected),
            CommandOutcome::Unchanged
        );
        assert_eq!(editor.dispatch(EditorCommand::Open), CommandOutcome::OpenRequested);

        editor
            .create_element(ElementKind::Div, 0.0, 0.0)
            .expect("create");
        assert_eq!(
            editor.dispatch(EditorCommand::ClearSelection),
            CommandOutcome::Changed
        );
        assert_eq!(
            editor.dispatch(EditorCommand::ClearSelection),
            CommandOutcome::Unchanged
        );

        match editor.dispatch(EditorCommand::Save) {
            CommandOutcome::Saved(project) => {
                assert_eq!(project.elements.len(), 1);
                assert_eq!(project.columns, DEFAULT_COLUMNS);
            }
            other => panic!("expected Saved, got {other:?}"),
        }
    }

    #[test]
    fn test_set_columns_range() {
        let mut editor = Editor::in_memory();
        editor.set_columns(6).expect("valid");
        assert_eq!(editor.columns(), 6);
        assert!(matches!(
            editor.set_columns(0),
            Err(CoreError::InvalidColumns(0))
        ));
        assert!(matches!(
            editor.set_columns(300),
            Err(CoreError::InvalidColumns(300))
        ));
        assert_eq!(editor.columns(), 6);
    }

    #[test]
    fn test_open_read_error_leaves_state() {
        let mut editor = Editor::in_memory();
        editor
            .create_element(ElementKind::Div, 0.0, 0.0)
            .expect("create");
        let before = editor.elements().to_vec();

        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(editor.open_result(Err(err)), Err(CoreError::Read(_))));
        assert!(matches!(
            editor.open_result(Ok("{\"elements\":{}}".to_string())),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(editor.elements(), before.as_slice());
    }

    #[test]
    fn test_open_replaces_state() {
        let mut editor = Editor::in_memory();
        editor
            .create_element(ElementKind::Div, 0.0, 0.0)
            .expect("create");
        let text = r##"{"elements":[{"id":"n","type":"navbar","x":0,"y":0}],"columns":4,"version":"1.0.0"}"##;
        editor.open_result(Ok(text.to_string())).expect("open");

        assert_eq!(editor.elements().len(), 1);
        assert_eq!(editor.elements()[0].kind, ElementKind::Navbar);
        assert_eq!(editor.columns(), 4);
        assert!(editor.selected().is_none());
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_storage_failure_does_not_block_editing() {
        let mut editor = Editor::new(EditorConfig::default(), Box::new(BrokenStore));
        assert!(!editor.restore());
        let id = editor
            .create_element(ElementKind::Text, 0.0, 0.0)
            .expect("create");
        assert!(editor.store().get(&id).is_some());
        assert!(matches!(
            editor.take_storage_error(),
            Some(StorageError::Unavailable(_))
        ));
        assert!(editor.take_storage_error().is_none());
    }

    #[test]
    fn test_restore_round_trip() {
        let mut first = Editor::in_memory();
        first
            .create_element(ElementKind::Hero, 0.0, 0.0)
            .expect("create");
        first.set_columns(3).expect("columns");
        let persisted = first.save().to_json().expect("json");

        let mut storage = MemoryStore::new();
        storage.set(PROJECT_KEY, &persisted).expect("set");
        let mut second = Editor::new(EditorConfig::default(), Box::new(storage));
        assert!(second.restore());
        assert_eq!(second.elements(), first.elements());
        assert_eq!(second.columns(), 3);
    }

    #[test]
    fn test_select_at() {
        let mut editor = Editor::in_memory();
        let id = editor
            .create_element(ElementKind::Button, 100.0, 100.0)
            .expect("create");
        editor.clear_selection();
        assert_eq!(editor.select_at(110.0, 110.0), Some(id));
        assert!(editor.select_at(0.0, 0.0).is_none());
        assert!(editor.selected().is_none());
    }
}
