//! Opening database storage and lookup.

use crate::builtin;
use crate::opening::Opening;

/// Number of leading plies considered when classifying a game.
pub const CLASSIFY_PLIES: usize = 10;

/// Label for games that match no known opening.
pub const UNKNOWN_OPENING: &str = "Unknown Opening";

/// An ordered collection of named openings.
#[derive(Debug, Clone, Default)]
pub struct OpeningDatabase {
    openings: Vec<Opening>,
}

impl OpeningDatabase {
    /// Creates a new empty opening database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in ECO table.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::builtin_database()
    }

    /// Creates a new opening database with the given openings.
    #[must_use]
    pub fn with_openings(openings: Vec<Opening>) -> Self {
        Self { openings }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.openings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    pub fn add(&mut self, opening: Opening) {
        self.openings.push(opening);
    }

    #[must_use]
    pub fn all(&self) -> &[Opening] {
        &self.openings
    }

    /// Finds all openings matching an ECO code prefix.
    ///
    /// For example, `by_eco("C5")` would match "C50", "C51", etc.
    #[must_use]
    pub fn by_eco(&self, eco_prefix: &str) -> Vec<&Opening> {
        self.openings
            .iter()
            .filter(|o| o.eco.starts_with(eco_prefix))
            .collect()
    }

    /// Searches for openings by name (case-insensitive substring match).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Opening> {
        let query_lower = query.to_lowercase();
        self.openings
            .iter()
            .filter(|o| o.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Finds the opening with the longest line that the game's first
    /// [`CLASSIFY_PLIES`] plies start with.
    ///
    /// On equal length the earlier entry wins.
    #[must_use]
    pub fn classify(&self, moves: &[String]) -> Option<&Opening> {
        let window = &moves[..moves.len().min(CLASSIFY_PLIES)];
        self.openings
            .iter()
            .filter(|o| o.is_prefix_of(window))
            .fold(None, |best: Option<&Opening>, candidate| match best {
                Some(current) if current.moves.len() >= candidate.moves.len() => Some(current),
                _ => Some(candidate),
            })
    }

    /// Label of [`classify`](Self::classify), or [`UNKNOWN_OPENING`].
    #[must_use]
    pub fn classify_label(&self, moves: &[String]) -> String {
        self.classify(moves)
            .map_or_else(|| UNKNOWN_OPENING.to_string(), Opening::label)
    }
}
