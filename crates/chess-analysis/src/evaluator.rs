//! Per-move evaluation of played games.

use std::path::PathBuf;

use chess_games::GameMove;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{AnalysisEngine, EngineError, EngineLimits};
use crate::evaluation::Evaluation;

/// Anything that can score a FEN position relative to its side to move.
pub trait PositionEvaluator {
    fn evaluate_fen(&mut self, fen: &str) -> Result<Evaluation, EngineError>;

    /// Scores a move from the mover's point of view as `(before, after)` centipawns.
    ///
    /// The engine reports `fen_after` for the opponent, so that score is negated.
    /// A side that fails to evaluate comes back as `None`.
    fn evaluate_move(&mut self, fen_before: &str, fen_after: &str) -> (Option<i32>, Option<i32>) {
        let before = match self.evaluate_fen(fen_before) {
            Ok(eval) => Some(eval.to_centipawns()),
            Err(e) => {
                warn!("Failed to evaluate position {fen_before}: {e}");
                None
            }
        };
        let after = match self.evaluate_fen(fen_after) {
            // Negate the collapsed score rather than flipping: a delivered
            // mate (`mate 0` for the opponent) must become +MATE_SCORE.
            Ok(eval) => Some(-eval.to_centipawns()),
            Err(e) => {
                warn!("Failed to evaluate position {fen_after}: {e}");
                None
            }
        };
        (before, after)
    }
}

/// Engine settings as configured by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub stockfish_path: PathBuf,
    pub evaluation_depth: u32,
    pub time_limit_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            stockfish_path: PathBuf::from("stockfish"),
            evaluation_depth: 15,
            time_limit_ms: 1_000,
        }
    }
}

impl EngineSettings {
    pub fn limits(&self) -> EngineLimits {
        EngineLimits {
            depth: self.evaluation_depth,
            movetime_ms: self.time_limit_ms,
        }
    }
}

/// Engine metadata reported alongside analysis results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub author: String,
    pub depth: u32,
    pub time_limit_ms: u64,
}

/// [`PositionEvaluator`] backed by a Stockfish process.
pub struct StockfishEvaluator {
    engine: AnalysisEngine,
    limits: EngineLimits,
}

impl StockfishEvaluator {
    /// Starts the engine described by `settings`.
    ///
    /// Fails with [`EngineError::NotFound`] before spawning anything when the
    /// path does not exist.
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let engine = AnalysisEngine::new(&settings.stockfish_path)?;
        info!("Stockfish engine started: {}", engine.name());
        Ok(Self {
            engine,
            limits: settings.limits(),
        })
    }

    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            name: self.engine.name().to_string(),
            author: self.engine.author().to_string(),
            depth: self.limits.depth,
            time_limit_ms: self.limits.movetime_ms,
        }
    }

    /// Best move for `fen` under the configured limits.
    pub fn best_move(&mut self, fen: &str) -> Result<Option<String>, EngineError> {
        self.engine.best_move(fen, &self.limits)
    }

    pub fn engine_mut(&mut self) -> &mut AnalysisEngine {
        &mut self.engine
    }
}

impl PositionEvaluator for StockfishEvaluator {
    fn evaluate_fen(&mut self, fen: &str) -> Result<Evaluation, EngineError> {
        Ok(self.engine.analyze_fen(fen, &self.limits)?.evaluation)
    }
}

/// A played move with mover-POV evaluations attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedMove {
    #[serde(flatten)]
    pub game_move: GameMove,
    pub evaluation_before: Option<i32>,
    pub evaluation_after: Option<i32>,
}

/// Evaluates every move in order. Failures leave `None` and never stop the batch.
pub fn evaluate_game_moves<E>(evaluator: &mut E, moves: &[GameMove]) -> Vec<EvaluatedMove>
where
    E: PositionEvaluator + ?Sized,
{
    moves
        .iter()
        .map(|mv| {
            let (evaluation_before, evaluation_after) =
                evaluator.evaluate_move(&mv.fen_before, &mv.fen_after);
            EvaluatedMove {
                game_move: mv.clone(),
                evaluation_before,
                evaluation_after,
            }
        })
        .collect()
}
