//! Fuzz target for document edits.
//!
//! Applies arbitrary replace/undo/redo sequences with integrity checking on,
//! so any divergence of the line index from a rescan panics.

#![no_main]

use arbitrary::Arbitrary;
use gapdoc::{Document, DocumentOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Replace { begin: u16, end: u16, text: String },
    ReplaceClusters { begin: u16, end: u16, text: String },
    Undo,
    Redo,
    BeginGroup,
    EndGroup,
    Select { anchor: u16, caret: u16 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut doc = Document::with_options(DocumentOptions::default().verify_integrity(true));

    for op in ops {
        match op {
            Op::Replace { begin, end, text } => {
                let (begin, end) = (usize::from(begin), usize::from(end));
                let valid = begin <= end && end <= doc.len();
                let before = doc.text();
                let result = doc.replace(begin..end, &text);
                assert_eq!(result.is_ok(), valid);
                if !valid {
                    assert_eq!(doc.text(), before);
                }
            }
            Op::ReplaceClusters { begin, end, text } => {
                let _ = doc.replace_clusters(usize::from(begin)..usize::from(end), &text);
            }
            Op::Undo => {
                doc.undo().unwrap();
            }
            Op::Redo => {
                doc.redo().unwrap();
            }
            Op::BeginGroup => doc.begin_group(),
            Op::EndGroup => doc.end_group(),
            Op::Select { anchor, caret } => {
                let _ = doc.set_selection(usize::from(anchor), usize::from(caret));
            }
        }
        assert_eq!(doc.chars().count(), doc.len());
    }

    while doc.undo().unwrap().is_applied() {}
    doc.check_integrity().unwrap();
});
