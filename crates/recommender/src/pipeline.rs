//! The five-step analysis pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use chess_analysis::{
    evaluate_game_moves, EngineError, EngineInfo, MistakeClassifier, MistakeStats,
    PositionEvaluator, StockfishEvaluator,
};
use chess_games::{Game, GameMove, PgnError, PgnParser};
use chess_openings::{classify_games, opening_stats, OpeningDatabase, OpeningStats};
use serde::{Deserialize, Serialize};
use study_plan::{
    aggregate_opening_mistakes, generate_study_plan, OpeningMistakeStats, Recommendation,
    RecommendationEngine, StudyPlan,
};
use thiserror::Error;
use tracing::info;

use crate::config::RecommenderConfig;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to parse PGN: {0}")]
    Pgn(#[from] PgnError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the pipeline produces for one PGN file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub games_parsed: usize,
    pub moves_evaluated: usize,
    pub mistake_stats: MistakeStats,
    pub opening_stats: BTreeMap<String, OpeningStats>,
    pub opening_mistake_stats: BTreeMap<String, OpeningMistakeStats>,
    pub recommendations: Vec<Recommendation>,
    pub study_plan: StudyPlan,
    /// Engine that produced the evaluations, when it was Stockfish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineInfo>,
}

/// Runs the pipeline with a freshly started Stockfish.
///
/// The PGN is parsed before the engine starts, so an unreadable file is
/// reported as [`PipelineError::Pgn`] even where Stockfish is missing.
pub fn analyze_games(
    pgn_path: impl AsRef<Path>,
    config: &RecommenderConfig,
) -> Result<AnalysisResults, PipelineError> {
    let games = parse_games(pgn_path.as_ref(), config)?;
    let mut evaluator = StockfishEvaluator::new(config.engine.settings())?;
    let mut results = analyze_parsed(&games, config, &mut evaluator);
    results.engine = Some(evaluator.info());
    Ok(results)
}

/// Runs the pipeline with the given evaluator.
pub fn analyze_games_with<E>(
    pgn_path: impl AsRef<Path>,
    config: &RecommenderConfig,
    evaluator: &mut E,
) -> Result<AnalysisResults, PipelineError>
where
    E: PositionEvaluator + ?Sized,
{
    let games = parse_games(pgn_path.as_ref(), config)?;
    Ok(analyze_parsed(&games, config, evaluator))
}

fn parse_games(pgn_path: &Path, config: &RecommenderConfig) -> Result<Vec<Game>, PgnError> {
    info!("Step 1: Parsing PGN file {}", pgn_path.display());
    let games = PgnParser::new(config.analysis).parse_file(pgn_path)?;
    info!("Parsed {} games", games.len());
    Ok(games)
}

/// Steps 2 to 5 over already parsed games.
fn analyze_parsed<E>(
    games: &[Game],
    config: &RecommenderConfig,
    evaluator: &mut E,
) -> AnalysisResults
where
    E: PositionEvaluator + ?Sized,
{
    info!("Step 2: Evaluating positions");
    let all_moves: Vec<GameMove> = games.iter().flat_map(|g| g.moves.iter().cloned()).collect();
    let evaluated = evaluate_game_moves(evaluator, &all_moves);
    info!("Evaluated {} moves", evaluated.len());

    info!("Step 3: Classifying mistakes");
    let moves_evaluated = evaluated.len();
    let classified = MistakeClassifier::new(config.mistake_thresholds).classify_batch(evaluated);
    let mistake_stats = MistakeStats::from_moves(&classified);
    info!(
        blunders = mistake_stats.blunders,
        mistakes = mistake_stats.mistakes,
        inaccuracies = mistake_stats.inaccuracies,
        "Mistake classification complete"
    );

    info!("Step 4: Classifying openings");
    let game_openings = classify_games(&OpeningDatabase::builtin(), games);
    let opening_stats = opening_stats(&game_openings);
    info!("Found {} distinct openings", opening_stats.len());

    info!("Step 5: Generating recommendations");
    let opening_mistake_stats = aggregate_opening_mistakes(&classified, &game_openings);
    let recommendations =
        RecommendationEngine::new(config.recommendation.clone()).generate(&opening_mistake_stats);
    let study_plan = generate_study_plan(&recommendations);
    info!("Generated {} recommendations", recommendations.len());

    AnalysisResults {
        games_parsed: games.len(),
        moves_evaluated,
        mistake_stats,
        opening_stats,
        opening_mistake_stats,
        recommendations,
        study_plan,
        engine: None,
    }
}
