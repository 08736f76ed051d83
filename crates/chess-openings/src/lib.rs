//! Chess opening lookup and per-opening statistics.
//!
//! Openings are keyed by their UCI move sequence. A game is classified by the
//! longest known line that its first [`CLASSIFY_PLIES`] plies start with.

pub mod builtin;
pub mod database;
pub mod opening;
pub mod stats;

pub use database::{OpeningDatabase, CLASSIFY_PLIES, UNKNOWN_OPENING};
pub use opening::Opening;
pub use stats::{classify_games, opening_stats, GameOpening, OpeningStats};
