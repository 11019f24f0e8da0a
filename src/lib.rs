//! `gapdoc` - Gap-buffered text documents for editors
//!
//! A character store, an incrementally maintained line index with per-line
//! dirty tracking, grouped undo/redo, selection tracking and run-length side
//! tables for highlighting and marks, all kept consistent behind a single
//! `replace` operation.
//!
//! # Examples
//!
//! ```
//! use gapdoc::{Document, LogicalLayout, LayoutStrategy, Position};
//!
//! let mut doc = Document::from_text("fn main() {\r\n}\r\n");
//! doc.insert(13, "    body();\r\n").unwrap();
//! assert_eq!(doc.line_count(), 4);
//! assert_eq!(doc.line_text(1).unwrap(), "    body();");
//!
//! let layout = LogicalLayout::new();
//! assert_eq!(layout.position_of_offset(&doc, 17), Position::new(1, 4));
//! ```

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)] // Allow text::TextStore etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Ranges are passed by value
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod error;
pub mod event;
pub mod highlight;
pub mod layout;
pub mod storage;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use event::{EditEvent, EditOrigin, ObserverId};
pub use highlight::{CharClass, HighlightScope, Highlighter, HighlighterRegistry};
pub use layout::{LayoutStrategy, LogicalLayout, Position, WrappedLayout};
pub use storage::{GapSequence, RunLengthArray, TextStore};
pub use text::{
    Document, DocumentGuard, DocumentOptions, EditAction, EditHistory, EditKind, HistoryStatus,
    LineDirtyState, LineIndex, MarkFlags, Selection, SharedDocument, WeakDocument,
};
pub use unicode::{LineEnding, WidthMethod};
