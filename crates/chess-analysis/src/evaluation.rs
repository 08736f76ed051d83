//! Engine score types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Centipawn value used for a forced mate. Mate in `n` becomes
/// `MATE_SCORE - n` so quicker mates score higher.
pub const MATE_SCORE: i32 = 10_000;

/// A position evaluation relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Centipawn score (positive = side to move is better).
    Centipawns(i32),
    /// Mate in N moves (positive = side to move mates, zero or negative = side to move is mated).
    Mate(i32),
}

impl Evaluation {
    /// Builds an evaluation from the `score cp` / `score mate` fields of a UCI info line.
    ///
    /// A mate score takes precedence when both are present.
    pub fn from_uci_score(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (cp, mate) {
            (_, Some(m)) => Some(Evaluation::Mate(m)),
            (Some(c), None) => Some(Evaluation::Centipawns(c)),
            (None, None) => None,
        }
    }

    /// The same evaluation seen from the other side.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Evaluation::Centipawns(cp) => Evaluation::Centipawns(-cp),
            Evaluation::Mate(n) => Evaluation::Mate(-n),
        }
    }

    /// Collapses the evaluation to a single centipawn number.
    pub fn to_centipawns(self) -> i32 {
        match self {
            Evaluation::Centipawns(cp) => cp,
            Evaluation::Mate(n) if n > 0 => MATE_SCORE - n,
            Evaluation::Mate(n) => -MATE_SCORE - n,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => write!(f, "{:+.2}", f64::from(*cp) / 100.0),
            Evaluation::Mate(n) => write!(f, "#{n}"),
        }
    }
}
