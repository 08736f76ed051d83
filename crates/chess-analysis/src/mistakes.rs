//! Threshold-based mistake tagging and mistake statistics.

use std::collections::BTreeMap;
use std::fmt;

use chess_games::GameMove;
use chess_openings::UNKNOWN_OPENING;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluator::EvaluatedMove;

/// Evaluation-change thresholds in centipawns (mover POV, so drops are negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MistakeThresholds {
    pub blunder: i32,
    pub mistake: i32,
    pub inaccuracy: i32,
    pub ok: i32,
}

impl Default for MistakeThresholds {
    fn default() -> Self {
        Self {
            blunder: -200,
            mistake: -100,
            inaccuracy: -50,
            ok: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mistake thresholds must satisfy blunder <= mistake <= inaccuracy <= ok, got {0:?}")]
pub struct InvalidThresholds(pub MistakeThresholds);

impl MistakeThresholds {
    pub fn validate(&self) -> Result<(), InvalidThresholds> {
        if self.blunder <= self.mistake
            && self.mistake <= self.inaccuracy
            && self.inaccuracy <= self.ok
        {
            Ok(())
        } else {
            Err(InvalidThresholds(*self))
        }
    }
}

/// Severity label for a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MistakeType {
    Blunder,
    Mistake,
    Inaccuracy,
    Ok,
    /// At least one evaluation was missing.
    Unknown,
}

impl MistakeType {
    pub fn as_str(self) -> &'static str {
        match self {
            MistakeType::Blunder => "blunder",
            MistakeType::Mistake => "mistake",
            MistakeType::Inaccuracy => "inaccuracy",
            MistakeType::Ok => "ok",
            MistakeType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MistakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An evaluated move with its mistake label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedMove {
    #[serde(flatten)]
    pub game_move: GameMove,
    pub evaluation_before: Option<i32>,
    pub evaluation_after: Option<i32>,
    pub mistake_type: MistakeType,
}

#[derive(Debug, Clone, Default)]
pub struct MistakeClassifier {
    thresholds: MistakeThresholds,
}

impl MistakeClassifier {
    pub fn new(thresholds: MistakeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &MistakeThresholds {
        &self.thresholds
    }

    /// Labels a move from its mover-POV evaluations. Boundaries are inclusive.
    pub fn classify(&self, before: Option<i32>, after: Option<i32>) -> MistakeType {
        let (Some(before), Some(after)) = (before, after) else {
            return MistakeType::Unknown;
        };
        let change = after - before;

        if change <= self.thresholds.blunder {
            MistakeType::Blunder
        } else if change <= self.thresholds.mistake {
            MistakeType::Mistake
        } else if change <= self.thresholds.inaccuracy {
            MistakeType::Inaccuracy
        } else {
            MistakeType::Ok
        }
    }

    pub fn classify_batch(&self, moves: Vec<EvaluatedMove>) -> Vec<ClassifiedMove> {
        moves
            .into_iter()
            .map(|mv| ClassifiedMove {
                mistake_type: self.classify(mv.evaluation_before, mv.evaluation_after),
                game_move: mv.game_move,
                evaluation_before: mv.evaluation_before,
                evaluation_after: mv.evaluation_after,
            })
            .collect()
    }
}

/// Counts per [`MistakeType`] with rates over all counted moves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MistakeStats {
    pub total_moves: usize,
    pub blunders: usize,
    pub mistakes: usize,
    pub inaccuracies: usize,
    pub ok_moves: usize,
    pub unknown: usize,
    pub blunder_rate: f64,
    pub mistake_rate: f64,
    pub inaccuracy_rate: f64,
    pub ok_rate: f64,
}

impl MistakeStats {
    pub fn from_moves(moves: &[ClassifiedMove]) -> Self {
        Self::from_types(moves.iter().map(|mv| mv.mistake_type))
    }

    pub fn from_types(types: impl IntoIterator<Item = MistakeType>) -> Self {
        let mut stats = Self::default();
        for mistake_type in types {
            stats.record(mistake_type);
        }
        stats.update_rates();
        stats
    }

    fn record(&mut self, mistake_type: MistakeType) {
        self.total_moves += 1;
        match mistake_type {
            MistakeType::Blunder => self.blunders += 1,
            MistakeType::Mistake => self.mistakes += 1,
            MistakeType::Inaccuracy => self.inaccuracies += 1,
            MistakeType::Ok => self.ok_moves += 1,
            MistakeType::Unknown => self.unknown += 1,
        }
    }

    fn update_rates(&mut self) {
        if self.total_moves == 0 {
            self.blunder_rate = 0.0;
            self.mistake_rate = 0.0;
            self.inaccuracy_rate = 0.0;
            self.ok_rate = 0.0;
            return;
        }
        let total = self.total_moves as f64;
        self.blunder_rate = self.blunders as f64 / total;
        self.mistake_rate = self.mistakes as f64 / total;
        self.inaccuracy_rate = self.inaccuracies as f64 / total;
        self.ok_rate = self.ok_moves as f64 / total;
    }
}

/// [`MistakeStats`] grouped by the opening label `opening_of` assigns to each move.
pub fn mistakes_by_opening<F>(
    moves: &[ClassifiedMove],
    opening_of: F,
) -> BTreeMap<String, MistakeStats>
where
    F: Fn(&ClassifiedMove) -> Option<String>,
{
    let mut grouped: BTreeMap<String, Vec<MistakeType>> = BTreeMap::new();
    for mv in moves {
        let label = opening_of(mv).unwrap_or_else(|| UNKNOWN_OPENING.to_string());
        grouped.entry(label).or_default().push(mv.mistake_type);
    }
    grouped
        .into_iter()
        .map(|(label, types)| (label, MistakeStats::from_types(types)))
        .collect()
}
