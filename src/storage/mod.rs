//! Storage containers: the generic gap buffer, the run-length side table and
//! the character store built on them.

mod gap;
mod run_length;
mod text_store;

pub use gap::GapSequence;
pub use run_length::RunLengthArray;
pub use text_store::TextStore;
