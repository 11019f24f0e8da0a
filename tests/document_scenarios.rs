//! Scenario tests for documents: CR/LF seams, history limits, notifications
//! and shared access.
//!
//! Run with:
//!   cargo test --test `document_scenarios` -- --nocapture
//! With logging:
//!   `RUST_LOG=trace` cargo test --test `document_scenarios` -- --nocapture

use gapdoc::{
    Document, DocumentOptions, EditEvent, EditOrigin, Error, HistoryStatus, LineDirtyState,
    LineIndex, Selection, SharedDocument,
};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{Level, info};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

fn assert_index_matches_rescan(doc: &Document) {
    assert_eq!(doc.line_heads(), LineIndex::scan(doc.chars()), "text {:?}", doc.text());
    assert_eq!(doc.dirty_states().len(), doc.line_count());
}

// ============================================================================
// CR/LF seams
// ============================================================================

mod seams {
    use super::*;

    #[test]
    fn empty_replace_at_crlf_is_noop_and_deleting_cr_merges() {
        init_logging();
        let mut doc = Document::from_text("ab\r\ncd");
        assert_eq!(doc.len(), 6);

        doc.replace(3..3, "").unwrap();
        assert_eq!(doc.line_heads(), vec![0, 4]);
        assert!(!doc.can_undo());

        doc.replace(2..3, "").unwrap();
        assert_eq!(doc.text(), "ab\ncd");
        assert_eq!(doc.line_heads(), vec![0, 3]);
    }

    #[test]
    fn lone_cr_in_inserted_text() {
        init_logging();
        let mut doc = Document::new();
        doc.replace(0..0, "x\ry").unwrap();
        assert_eq!(doc.text(), "x\ry");
        assert_eq!(doc.line_heads(), vec![0, 2]);
    }

    #[test]
    fn lf_after_lone_cr_joins_then_splits_again() {
        init_logging();
        let mut doc = Document::from_text("a\rb");
        assert_eq!(doc.line_heads(), vec![0, 2]);

        doc.insert(2, "\n").unwrap();
        assert_eq!(doc.line_heads(), vec![0, 3]);

        doc.delete(2..3).unwrap();
        assert_eq!(doc.line_heads(), vec![0, 2]);
    }

    #[test]
    fn splitting_crlf_creates_two_terminators() {
        let mut doc = Document::from_text("a\r\nb");
        doc.insert(2, "x").unwrap();
        assert_eq!(doc.text(), "a\rx\nb");
        assert_eq!(doc.line_heads(), vec![0, 2, 4]);
        assert_index_matches_rescan(&doc);
    }

    #[test]
    fn deleting_lf_of_crlf_before_another_lf() {
        let mut doc = Document::from_text("a\r\n\nb");
        assert_eq!(doc.line_heads(), vec![0, 3, 4]);
        doc.delete(2..3).unwrap();
        assert_eq!(doc.text(), "a\r\nb");
        assert_eq!(doc.line_heads(), vec![0, 3]);
    }

    #[test]
    fn deleting_between_cr_and_lf_brings_them_together() {
        let mut doc = Document::from_text("a\rzz\nb");
        assert_eq!(doc.line_heads(), vec![0, 2, 5]);
        doc.delete(2..4).unwrap();
        assert_eq!(doc.text(), "a\r\nb");
        assert_eq!(doc.line_heads(), vec![0, 3]);
    }

    #[test]
    fn inserted_text_ending_in_cr_before_lf() {
        let mut doc = Document::from_text("ab\ncd");
        doc.insert(2, "x\r").unwrap();
        assert_eq!(doc.text(), "abx\r\ncd");
        assert_eq!(doc.line_heads(), vec![0, 5]);
    }

    #[test]
    fn merged_line_is_dirty() {
        let mut doc = Document::from_text("one\ntwo\nthree");
        doc.delete(3..4).unwrap();
        assert_eq!(
            doc.dirty_states(),
            vec![LineDirtyState::Dirty, LineDirtyState::Clean]
        );
    }
}

// ============================================================================
// History
// ============================================================================

mod history {
    use super::*;

    #[test]
    fn capacity_two_evicts_oldest() {
        init_logging();
        let mut doc = Document::with_options(DocumentOptions::default().history_capacity(2));
        doc.insert(0, "a").unwrap();
        doc.insert(1, "b").unwrap();
        doc.insert(2, "c").unwrap();

        assert_eq!(doc.undo().unwrap(), HistoryStatus::Applied { actions: 1 });
        assert_eq!(doc.undo().unwrap(), HistoryStatus::Applied { actions: 1 });
        assert_eq!(doc.undo().unwrap(), HistoryStatus::NothingToUndo);
        assert_eq!(doc.text(), "a");
    }

    #[test]
    fn shrinking_capacity_evicts_immediately() {
        let mut doc = Document::new();
        for i in 0..5 {
            doc.insert(i, "x").unwrap();
        }
        doc.set_history_capacity(1);
        assert_eq!(doc.history_capacity(), 1);
        assert!(doc.undo().unwrap().is_applied());
        assert_eq!(doc.undo().unwrap(), HistoryStatus::NothingToUndo);
    }

    #[test]
    fn nested_groups_form_one_step() {
        let mut doc = Document::from_text("hello");
        doc.begin_group();
        doc.insert(5, " there").unwrap();
        doc.group(|doc| {
            doc.replace(0..1, "H").unwrap();
            doc.insert(11, "!").unwrap();
        });
        doc.end_group();
        assert_eq!(doc.text(), "Hello there!");

        assert_eq!(doc.undo().unwrap(), HistoryStatus::Applied { actions: 3 });
        assert_eq!(doc.text(), "hello");
        assert!(!doc.can_undo());
    }

    #[test]
    fn undo_redo_walk_restores_each_state() {
        let mut doc = Document::from_text("a\r\nb");
        let mut states = vec![(doc.text(), doc.line_heads(), doc.dirty_states())];
        for (range, text) in [(1..2, ""), (0..0, "\n"), (3..4, "x\r\ny")] {
            doc.replace(range, text).unwrap();
            states.push((doc.text(), doc.line_heads(), doc.dirty_states()));
        }

        for expected in states.iter().rev().skip(1) {
            doc.undo().unwrap();
            assert_eq!(&(doc.text(), doc.line_heads(), doc.dirty_states()), expected);
        }
        for expected in states.iter().skip(1) {
            doc.redo().unwrap();
            assert_eq!(&(doc.text(), doc.line_heads(), doc.dirty_states()), expected);
        }
    }

    #[test]
    fn undo_restores_selection_before_edit() {
        let mut doc = Document::from_text("select me");
        doc.set_selection(0, 6).unwrap();
        doc.replace_selection("pick").unwrap();
        assert_eq!(doc.text(), "pick me");
        assert_eq!(doc.selection(), Selection::caret_at(4));

        doc.undo().unwrap();
        assert_eq!(doc.selection(), Selection::new(0, 6));
        doc.redo().unwrap();
        assert_eq!(doc.selection(), Selection::caret_at(4));
    }
}

// ============================================================================
// Validation
// ============================================================================

mod validation {
    use super::*;

    #[test]
    fn rejected_edit_leaves_exact_state() {
        let mut doc = Document::from_text("abc\ndef");
        doc.insert(3, "!").unwrap();
        doc.set_selection(2, 5).unwrap();
        let before = (
            doc.text(),
            doc.line_heads(),
            doc.dirty_states(),
            doc.selection(),
            doc.history().undo_len(),
            doc.revision(),
        );

        let err = doc.replace(6..99, "zzz").unwrap_err();
        assert!(err.is_range_error());
        assert_eq!(
            err,
            Error::InvalidRange {
                begin: 6,
                end: 99,
                len: 8
            }
        );

        let after = (
            doc.text(),
            doc.line_heads(),
            doc.dirty_states(),
            doc.selection(),
            doc.history().undo_len(),
            doc.revision(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn cluster_respecting_edit_refuses_split() {
        let mut doc = Document::from_text("x👍🏽y");
        assert!(!doc.is_divisible(2));
        assert_eq!(
            doc.replace_clusters(2..3, ""),
            Err(Error::ClusterBoundary { offset: 2 })
        );
        assert_eq!(doc.next_cluster_index(1), 3);
        assert_eq!(doc.prev_cluster_index(3), 1);
        doc.replace_clusters(1..3, "").unwrap();
        assert_eq!(doc.text(), "xy");
    }

    #[test]
    fn cluster_respecting_edit_keeps_flags_whole_in_long_runs() {
        let flags = "\u{1F1FA}\u{1F1F8}".repeat(40);
        let mut doc = Document::from_text(&flags);
        for offset in (65..80).step_by(2) {
            assert!(!doc.is_divisible(offset), "offset {offset}");
        }
        assert_eq!(
            doc.replace_clusters(67..67, "x"),
            Err(Error::ClusterBoundary { offset: 67 })
        );
        assert_eq!(doc.text(), flags);
        doc.replace_clusters(66..68, "").unwrap();
        assert_eq!(doc.len(), 78);
    }
}

// ============================================================================
// Notifications and shared access
// ============================================================================

mod notifications {
    use super::*;

    #[test]
    fn observer_sees_fully_updated_index() {
        init_logging();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut doc = Document::from_text("one\ntwo");
        let sink = Arc::clone(&log);
        doc.subscribe(move |doc, event: &EditEvent| {
            let heads = doc.line_heads();
            assert_eq!(heads, LineIndex::scan(doc.chars()));
            sink.lock().unwrap().push((event.origin, heads));
        });

        doc.insert(3, "\r").unwrap();
        doc.undo().unwrap();
        doc.redo().unwrap();

        let log = log.lock().unwrap();
        info!(events = log.len(), "observed edits");
        assert_eq!(
            *log,
            vec![
                (EditOrigin::Edit, vec![0, 5]),
                (EditOrigin::Undo, vec![0, 4]),
                (EditOrigin::Redo, vec![0, 5]),
            ]
        );
    }

    #[test]
    fn edit_from_notification_fails_with_reentrancy() {
        init_logging();
        let shared = SharedDocument::new(Document::new());
        let weak = shared.downgrade();
        let outcome = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&outcome);
        shared
            .write(|doc| {
                doc.subscribe(move |_, _| {
                    if let Some(handle) = weak.upgrade() {
                        *slot.lock().unwrap() = Some(handle.replace(0..0, "again"));
                    }
                })
            })
            .unwrap();

        shared.replace(0..0, "once").unwrap();
        assert_eq!(*outcome.lock().unwrap(), Some(Err(Error::Reentrancy)));
        assert_eq!(shared.text().unwrap(), "once");
    }

    #[test]
    fn background_search_over_snapshot() {
        let doc = Arc::new(Mutex::new(Document::from_text("needle in a haystack")));
        let snapshot = doc.lock().unwrap().snapshot();
        let search = thread::spawn(move || snapshot.index_of("hay", 0, true));

        doc.lock().unwrap().insert(0, ">> ").unwrap();
        assert_eq!(search.join().unwrap(), Some(12));
        assert_eq!(doc.lock().unwrap().find_next("hay", 0, true), Some(15));
    }
}
