//! Core opening type.

use serde::{Deserialize, Serialize};

/// A named opening line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code or code range for this opening (e.g., "B20", "C20-C99").
    pub eco: String,
    /// The name of the opening.
    pub name: String,
    /// The defining move sequence in UCI notation.
    pub moves: Vec<String>,
}

impl Opening {
    /// Creates a new opening with the given ECO code, name, and moves.
    #[must_use]
    pub fn new(eco: impl Into<String>, name: impl Into<String>, moves: Vec<String>) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves,
        }
    }

    /// Creates an opening from a space-separated UCI line.
    #[must_use]
    pub fn from_line(eco: impl Into<String>, name: impl Into<String>, line: &str) -> Self {
        Self::new(eco, name, line.split_whitespace().map(str::to_string).collect())
    }

    /// Display label, `"{eco} {name}"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.eco, self.name)
    }

    /// Whether `moves` starts with this opening's full line.
    #[must_use]
    pub fn is_prefix_of(&self, moves: &[String]) -> bool {
        !self.moves.is_empty() && moves.starts_with(&self.moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_new() {
        let opening = Opening::new(
            "C44",
            "King's Pawn Game",
            vec!["e2e4".to_string(), "e7e5".to_string()],
        );
        assert_eq!(opening.eco, "C44");
        assert_eq!(opening.name, "King's Pawn Game");
        assert_eq!(opening.moves.len(), 2);
        assert_eq!(opening.label(), "C44 King's Pawn Game");
    }

    #[test]
    fn test_from_line_and_prefix() {
        let opening = Opening::from_line("B20", "Sicilian Defense", "e2e4 c7c5");
        assert_eq!(opening.moves, vec!["e2e4", "c7c5"]);

        let game: Vec<String> = ["e2e4", "c7c5", "g1f3"].iter().map(|s| s.to_string()).collect();
        assert!(opening.is_prefix_of(&game));
        assert!(!opening.is_prefix_of(&game[..1]));
        assert!(!Opening::new("A00", "Empty", vec![]).is_prefix_of(&game));
    }
}
