//! Property-based tests for document editing.
//!
//! The naive model is a `Vec<char>`: every edit sequence must produce the
//! same text, and the maintained line index must equal a full rescan.

use gapdoc::{Document, DocumentOptions, GapSequence, LineIndex, RunLengthArray};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Text biased towards line terminators so CR/LF seams are hit often.
fn edit_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["\r", "\n", "\r\n", "a", "bc", "é", "e\u{0301}", "漢"]),
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

/// `(begin, end, text)` with positions as fractions of the current length.
fn edit() -> impl Strategy<Value = (f64, f64, String)> {
    (0.0..=1.0f64, 0.0..=1.0f64, edit_text())
}

fn edits() -> impl Strategy<Value = Vec<(f64, f64, String)>> {
    prop::collection::vec(edit(), 1..40)
}

fn resolve(len: usize, a: f64, b: f64) -> (usize, usize) {
    let to_offset = |f: f64| ((len as f64) * f).round() as usize;
    let (x, y) = (to_offset(a).min(len), to_offset(b).min(len));
    (x.min(y), x.max(y))
}

fn checked_doc() -> Document {
    Document::with_options(DocumentOptions::default().verify_integrity(true))
}

// ============================================================================
// Document Properties
// ============================================================================

proptest! {
    /// Text read back character by character equals the naive model.
    #[test]
    fn replace_matches_naive_model(ops in edits()) {
        let mut doc = checked_doc();
        let mut model: Vec<char> = Vec::new();
        for (a, b, text) in &ops {
            let (begin, end) = resolve(model.len(), *a, *b);
            doc.replace(begin..end, text).unwrap();
            model.splice(begin..end, text.chars());
        }
        let read: Vec<char> = (0..doc.len()).map(|i| doc.char_at(i).unwrap()).collect();
        prop_assert_eq!(read, model);
    }

    /// The incrementally maintained index equals a rescan after every edit.
    #[test]
    fn line_index_matches_rescan(ops in edits()) {
        let mut doc = Document::with_options(DocumentOptions::default().verify_integrity(false));
        for (a, b, text) in &ops {
            let (begin, end) = resolve(doc.len(), *a, *b);
            doc.replace(begin..end, text).unwrap();
            prop_assert_eq!(doc.line_heads(), LineIndex::scan(doc.chars()));
            prop_assert_eq!(doc.dirty_states().len(), doc.line_count());
        }
    }

    /// Undo right after an edit restores the pre-edit state; redo restores
    /// the post-edit state.
    #[test]
    fn undo_redo_are_inverses(
        initial in edit_text(),
        ops in edits(),
        caret in 0.0..=1.0f64,
    ) {
        let mut doc = Document::from_text(&initial);
        for (a, b, text) in &ops {
            let (anchor, _) = resolve(doc.len(), caret, caret);
            doc.set_caret(anchor).unwrap();
            let before = (doc.text(), doc.line_heads(), doc.dirty_states(), doc.selection());

            let (begin, end) = resolve(doc.len(), *a, *b);
            doc.replace(begin..end, text).unwrap();
            let after = (doc.text(), doc.line_heads(), doc.dirty_states(), doc.selection());

            if begin == end && text.is_empty() {
                continue;
            }
            prop_assert!(doc.undo().unwrap().is_applied());
            prop_assert_eq!(
                (doc.text(), doc.line_heads(), doc.dirty_states(), doc.selection()),
                before
            );
            prop_assert!(doc.redo().unwrap().is_applied());
            prop_assert_eq!(
                (doc.text(), doc.line_heads(), doc.dirty_states(), doc.selection()),
                after
            );
        }
    }

    /// Undoing everything returns to the initial text.
    #[test]
    fn undo_all_restores_initial(initial in edit_text(), ops in edits()) {
        let mut doc = Document::from_text(&initial);
        for (a, b, text) in &ops {
            let (begin, end) = resolve(doc.len(), *a, *b);
            doc.replace(begin..end, text).unwrap();
        }
        while doc.undo().unwrap().is_applied() {}
        prop_assert_eq!(doc.text(), initial);
        prop_assert_eq!(doc.line_heads(), LineIndex::scan(doc.chars()));
    }

    /// Out-of-range edits never change anything.
    #[test]
    fn invalid_range_is_rejected(initial in edit_text(), extra in 1usize..10) {
        let mut doc = Document::from_text(&initial);
        let len = doc.len();
        prop_assert!(doc.replace(0..len + extra, "x").is_err());
        prop_assert_eq!(doc.text(), initial);
        prop_assert!(!doc.can_undo());
    }

    /// Character classes and marks stay one per character.
    #[test]
    fn side_tables_track_length(ops in edits()) {
        let mut doc = checked_doc();
        for (a, b, text) in &ops {
            let (begin, end) = resolve(doc.len(), *a, *b);
            doc.replace(begin..end, text).unwrap();
            let runs: usize = doc.char_class_runs().map(|(range, _)| range.len()).sum();
            prop_assert_eq!(runs, doc.len());
        }
    }
}

// ============================================================================
// Storage Properties
// ============================================================================

proptest! {
    /// Gap sequence inserts and removes behave like `Vec`.
    #[test]
    fn gap_sequence_matches_vec(
        ops in prop::collection::vec((any::<bool>(), 0.0..=1.0f64, 0usize..8), 1..60)
    ) {
        let mut seq: GapSequence<u32> = GapSequence::new();
        let mut model: Vec<u32> = Vec::new();
        for (n, (insert, at, count)) in ops.into_iter().enumerate() {
            let index = ((model.len() as f64) * at) as usize;
            if insert {
                let values: Vec<u32> = (0..count as u32).map(|v| v + n as u32 * 100).collect();
                seq.insert_range(index, &values).unwrap();
                model.splice(index..index, values);
            } else {
                let count = count.min(model.len() - index);
                seq.remove_range(index, count).unwrap();
                model.drain(index..index + count);
            }
        }
        prop_assert_eq!(seq.iter().collect::<Vec<_>>(), model);
    }

    /// Run-length arrays stay coalesced and agree with a flat model.
    #[test]
    fn run_length_stays_coalesced(
        ops in prop::collection::vec((0.0..=1.0f64, 0.0..=1.0f64, 0u8..3), 1..40)
    ) {
        let mut runs = RunLengthArray::filled(0u8, 20);
        let mut model = vec![0u8; 20];
        for (a, b, value) in ops {
            let (begin, end) = resolve(model.len(), a, b);
            runs.set_range(begin..end, value).unwrap();
            model[begin..end].fill(value);
        }
        prop_assert_eq!(runs.iter().collect::<Vec<_>>(), model);
        let values: Vec<u8> = runs.runs().map(|(_, v)| v).collect();
        prop_assert!(values.windows(2).all(|w| w[0] != w[1]));
    }
}
