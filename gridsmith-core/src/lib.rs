//! # Gridsmith Core
//!
//! Document model for a grid page composer: positioned, styled elements
//! placed on a column grid, with bounded undo history and a compiler that
//! turns each element into utility-class tokens plus residual inline style.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├──────────────────────┬──────────────────────┤
//! │  ElementStore        │  HistoryEngine       │
//! │  - Element list      │  - Snapshots         │
//! │  - Selection         │  - Cursor, bound 50  │
//! ├──────────────────────┼──────────────────────┤
//! │  StyleCompiler       │  ProjectSerializer   │
//! │  - Class tokens      │  - Validate / load   │
//! │  - Residual style    │  - KeyValueStore     │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod content;
pub mod element;
pub mod error;
pub mod history;
pub mod project;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod store;
pub mod style;

pub use content::escape_html;
pub use element::{
    snap_to_grid, Animation, AnimationKind, BorderStyle, Display, Element, ElementId, ElementKind,
    ElementPatch, Position, Sides,
};
pub use error::{CoreError, CoreResult, ReadError, StorageError, ValidationError};
pub use history::{HistoryEngine, Snapshot, DEFAULT_HISTORY_LIMIT};
pub use project::{
    Project, ProjectSerializer, COLUMN_RANGE, DEFAULT_COLUMNS, EXPORT_FILE_NAME, FORMAT_VERSION,
};
pub use schedule::{CommitDebouncer, DEFAULT_COMMIT_DELAY};
pub use session::{CommandOutcome, Editor, EditorCommand, EditorConfig};
pub use storage::{FileStore, KeyValueStore, MemoryStore, PROJECT_KEY};
pub use store::{ElementStore, DEFAULT_GRID_QUANTUM};
pub use style::{CompiledStyle, Declaration, StyleCompiler};

/// Gridsmith core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
