//! PGN parsing for the opening study pipeline.
//!
//! This crate turns a PGN file into [`Game`] values whose main-line moves
//! carry the position before and after each move, in both UCI and SAN.
//!
//! # Overview
//!
//! - [`PgnParser`] - Reads games from a file or any reader, honouring [`ParseLimits`]
//! - [`Game`] / [`GameMove`] - Parsed game metadata and per-move records
//! - [`MoveRecord`] - Flat per-move rows joined with game metadata
//! - [`save_processed_games`] / [`load_processed_games`] - JSON persistence
//!
//! # Example
//!
//! ```ignore
//! use chess_games::{ParseLimits, PgnParser};
//!
//! let parser = PgnParser::new(ParseLimits::default());
//! let games = parser.parse_file("games.pgn")?;
//! println!("Parsed {} games", games.len());
//! ```

pub mod game;
pub mod parser;
pub mod records;
pub mod store;

pub use game::{Color, Game, GameMove, STARTING_FEN};
pub use parser::{ParseLimits, PgnError, PgnParser};
pub use records::{games_to_records, MoveRecord};
pub use store::{load_processed_games, save_processed_games};
