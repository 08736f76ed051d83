//! Built-in opening table.
//!
//! Covers the common King's Pawn, Sicilian, French, Caro-Kann, Queen's Pawn,
//! Indian and English lines. Intermediate lines repeat their parent's label so
//! that a game leaving book early still gets the closest name.

use crate::database::OpeningDatabase;
use crate::opening::Opening;

const BUILTIN_LINES: &[(&str, &str, &str)] = &[
    // King's Pawn
    ("C20-C99", "King's Pawn Game", "e2e4 e7e5"),
    ("C40", "King's Knight Opening", "e2e4 e7e5 g1f3"),
    ("C50", "Giuoco Piano", "e2e4 e7e5 g1f3 b8c6"),
    ("C50", "Giuoco Piano", "e2e4 e7e5 g1f3 b8c6 f1c4"),
    ("C50", "Giuoco Piano", "e2e4 e7e5 g1f3 b8c6 f1c4 f8c5"),
    ("C60", "Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5"),
    ("C60", "Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6"),
    ("C60", "Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6 b5a4"),
    // Sicilian
    ("B20", "Sicilian Defense", "e2e4 c7c5"),
    ("B20", "Sicilian Defense", "e2e4 c7c5 g1f3"),
    ("B40", "Sicilian Defense", "e2e4 c7c5 g1f3 d7d6"),
    ("B40", "Sicilian Defense", "e2e4 c7c5 g1f3 d7d6 d2d4"),
    ("B40", "Sicilian Defense", "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4"),
    ("B40", "Sicilian Defense", "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4"),
    // French
    ("C00", "French Defense", "e2e4 e7e6"),
    ("C00", "French Defense", "e2e4 e7e6 d2d4"),
    ("C00", "French Defense", "e2e4 e7e6 d2d4 d7d5"),
    ("C00", "French Defense", "e2e4 e7e6 d2d4 d7d5 e4e5"),
    // Caro-Kann
    ("B10", "Caro-Kann Defense", "e2e4 c7c6"),
    ("B10", "Caro-Kann Defense", "e2e4 c7c6 d2d4"),
    ("B10", "Caro-Kann Defense", "e2e4 c7c6 d2d4 d7d5"),
    // Queen's Pawn
    ("D00", "Queen's Pawn Game", "d2d4"),
    ("D00", "Queen's Pawn Game", "d2d4 d7d5"),
    ("D20", "Queen's Gambit", "d2d4 d7d5 c2c4"),
    ("D20", "Queen's Gambit", "d2d4 d7d5 c2c4 d5c4"),
    ("D30", "Queen's Gambit Declined", "d2d4 d7d5 c2c4 e7e6"),
    ("A40", "Queen's Pawn Game", "d2d4 g8f6"),
    ("A40", "Queen's Pawn Game", "d2d4 g8f6 c2c4"),
    // Indian
    ("E00", "Indian Game", "d2d4 g8f6 c2c4 e7e6"),
    ("E60", "King's Indian Defense", "d2d4 g8f6 c2c4 g7g6"),
    // English
    ("A10", "English Opening", "c2c4"),
    ("A10", "English Opening", "c2c4 e7e5"),
    ("A10", "English Opening", "c2c4 g8f6"),
    ("A10", "English Opening", "c2c4 e7e6"),
];

/// All built-in openings, in table order.
#[must_use]
pub fn builtin_openings() -> Vec<Opening> {
    BUILTIN_LINES
        .iter()
        .map(|(eco, name, line)| Opening::from_line(*eco, *name, line))
        .collect()
}

/// Creates the built-in opening database.
#[must_use]
pub fn builtin_database() -> OpeningDatabase {
    OpeningDatabase::with_openings(builtin_openings())
}
