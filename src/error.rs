//! Error types for gapdoc.

use std::fmt;

/// Result type alias for gapdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for gapdoc operations.
///
/// Running out of undo or redo history is not an error; see
/// [`HistoryStatus`](crate::text::HistoryStatus).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Index outside `[0, len)` for element access on a sequence.
    OutOfRange { index: usize, len: usize },
    /// Range outside `[0, len]` or with `begin > end`.
    InvalidRange { begin: usize, end: usize, len: usize },
    /// A cluster-respecting edit would split a grapheme cluster at `offset`.
    ClusterBoundary { offset: usize },
    /// Mutation attempted while edit notifications are being dispatched.
    Reentrancy,
    /// Internal consistency check failed. Indicates a bug in index maintenance.
    Integrity(String),
}

impl Error {
    /// Returns true for the range-error family (bad offsets or cluster splits).
    #[must_use]
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::InvalidRange { .. } | Self::ClusterBoundary { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::InvalidRange { begin, end, len } => {
                write!(f, "invalid range {begin}..{end} for length {len}")
            }
            Self::ClusterBoundary { offset } => {
                write!(f, "offset {offset} splits a grapheme cluster")
            }
            Self::Reentrancy => write!(f, "document mutated during edit notification"),
            Self::Integrity(msg) => write!(f, "integrity check failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
