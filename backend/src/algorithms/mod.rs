//! Pure scheduling algorithms.

pub mod conflicts;

pub use conflicts::{find_conflict, first_conflict, CandidateWindow, OverlapQuery};
