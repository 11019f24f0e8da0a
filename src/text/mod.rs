//! Editable documents.
//!
//! Key types:
//!
//! - [`Document`]: text, line index, selection, history and side tables kept
//!   consistent through a single `replace` entry point
//! - [`LineIndex`]: line heads plus per-line [`LineDirtyState`]
//! - [`EditHistory`]: grouped undo/redo with a bounded capacity
//! - [`SharedDocument`]: lock-based handle that rejects reentrant edits
//!
//! # Examples
//!
//! ```
//! use gapdoc::{Document, HistoryStatus, LineDirtyState};
//!
//! let mut doc = Document::from_text("first\nsecond");
//! doc.insert(6, "the ").unwrap();
//! assert_eq!(doc.line_text(1).unwrap(), "the second");
//! assert_eq!(doc.line_dirty_state(1), Some(LineDirtyState::Dirty));
//!
//! assert_eq!(doc.undo().unwrap(), HistoryStatus::Applied { actions: 1 });
//! assert_eq!(doc.undo().unwrap(), HistoryStatus::NothingToUndo);
//! ```

mod dirty;
mod document;
mod history;
mod line_index;
mod marks;
mod selection;
mod shared;

pub use dirty::{DirtyTable, LineDirtyState};
pub use document::{Document, DocumentOptions};
pub use history::{DEFAULT_HISTORY_CAPACITY, EditAction, EditHistory, EditKind, HistoryStatus};
pub use line_index::LineIndex;
pub use marks::MarkFlags;
pub use selection::{Selection, SelectionManager, adjust_offset};
pub use shared::{DocumentGuard, SharedDocument, WeakDocument};
