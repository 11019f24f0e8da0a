//! Marking flags layered over text ranges.

use bitflags::bitflags;

bitflags! {
    /// Marks attached to characters (URIs, search hits, diagnostics).
    ///
    /// Bits not named here are kept as-is, so hosts can define their own.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct MarkFlags: u32 {
        /// Part of a detected URI.
        const URI = 1 << 0;
        /// Part of a search hit.
        const SEARCH_HIT = 1 << 1;
        /// Flagged by a spell checker.
        const MISSPELLED = 1 << 2;
        /// Covered by a warning diagnostic.
        const WARNING = 1 << 3;
        /// Covered by an error diagnostic.
        const ERROR = 1 << 4;

        const _ = !0;
    }
}
