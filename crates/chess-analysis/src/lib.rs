//! Engine evaluation and mistake classification for played moves.
//!
//! # Overview
//!
//! - [`AnalysisEngine`] - Blocking wrapper for UCI analysis engines like Stockfish
//! - [`Evaluation`] - Position evaluation (centipawn or mate score)
//! - [`PositionEvaluator`] - Scores positions; [`StockfishEvaluator`] is the engine-backed one
//! - [`MistakeClassifier`] - Labels moves as blunder, mistake, inaccuracy or ok
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{
//!     evaluate_game_moves, EngineSettings, MistakeClassifier, StockfishEvaluator,
//! };
//!
//! let mut evaluator = StockfishEvaluator::new(EngineSettings::default())?;
//! let evaluated = evaluate_game_moves(&mut evaluator, &game.moves);
//! let classified = MistakeClassifier::default().classify_batch(evaluated);
//! ```

pub mod engine;
pub mod evaluation;
pub mod evaluator;
pub mod mistakes;

pub use engine::{AnalysisEngine, EngineError, EngineLimits, PositionAnalysis, MAX_UCI_LINES};
pub use evaluation::{Evaluation, MATE_SCORE};
pub use evaluator::{
    evaluate_game_moves, EngineInfo, EngineSettings, EvaluatedMove, PositionEvaluator,
    StockfishEvaluator,
};
pub use mistakes::{
    mistakes_by_opening, ClassifiedMove, InvalidThresholds, MistakeClassifier, MistakeStats,
    MistakeThresholds, MistakeType,
};
