//! Parsed game and move types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The side that played a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// White pieces.
    White,
    /// Black pieces.
    Black,
}

impl Color {
    /// Returns the opposite side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }
}

/// A single main-line move with the positions around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMove {
    /// Identifier of the game this move belongs to.
    pub game_id: String,
    /// Full-move number (1 for the first white and black moves).
    pub move_number: u32,
    /// Side that played the move.
    pub player: Color,
    /// Position before the move in FEN notation.
    pub fen_before: String,
    /// Position after the move in FEN notation.
    pub fen_after: String,
    /// The move in UCI notation (e.g., "e2e4").
    pub move_uci: String,
    /// The move in SAN notation as written in the PGN (e.g., "Nf3+").
    pub move_san: String,
}

/// A complete parsed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Identifier assigned during parsing (`game_0`, `game_1`, ...).
    pub game_id: String,
    /// White player name, `"Unknown"` when the header is missing.
    pub white_player: String,
    /// Black player name, `"Unknown"` when the header is missing.
    pub black_player: String,
    /// Game result (`1-0`, `0-1`, `1/2-1/2` or `*`).
    pub result: String,
    /// Date header, if present.
    pub date: Option<String>,
    /// Event header, if present.
    pub event: Option<String>,
    /// Site header, if present.
    pub site: Option<String>,
    /// Main-line moves in play order.
    #[serde(default)]
    pub moves: Vec<GameMove>,
}

impl Game {
    /// Creates a game with the given players and result and no moves.
    #[must_use]
    pub fn new(
        game_id: impl Into<String>,
        white_player: impl Into<String>,
        black_player: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            white_player: white_player.into(),
            black_player: black_player.into(),
            result: result.into(),
            date: None,
            event: None,
            site: None,
            moves: Vec::new(),
        }
    }

    /// Returns the main line as UCI moves.
    #[must_use]
    pub fn uci_moves(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.move_uci.clone()).collect()
    }
}
