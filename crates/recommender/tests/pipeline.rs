//! End-to-end pipeline runs with a scripted evaluator in place of Stockfish.

use std::collections::HashMap;
use std::io::Write;

use chess_analysis::{EngineError, Evaluation, PositionEvaluator};
use chess_games::PgnParser;
use recommender::{
    analyze_games, analyze_games_with, save_results, AnalysisResults, PipelineError, RecommenderConfig,
    ANALYSIS_FILE, RECOMMENDATIONS_FILE,
};
use study_plan::{RecommendationType, StudyFocus};

const GAMES: &str = r#"[White "Ann"]
[Black "Bo"]
[Result "1-0"]

1. e4 c5 2. Nc3 d6 3. f4 Nc6 4. Nf3 g6 1-0

[White "Cy"]
[Black "Di"]
[Result "0-1"]

1. e4 c5 2. Nc3 Nc6 3. g3 g6 4. Bg2 Bg7 0-1

[White "Ed"]
[Black "Flo"]
[Result "1/2-1/2"]

1. e4 e6 2. d4 d5 3. Nc3 Nf6 4. Bg5 Be7 1/2-1/2
"#;

const SICILIAN: &str = "B20 Sicilian Defense";
const FRENCH: &str = "C00 French Defense";

/// Scores every position 0 except the listed ones; counts calls.
struct Scripted {
    scores: HashMap<String, Evaluation>,
    failing: Option<String>,
    calls: usize,
}

impl PositionEvaluator for Scripted {
    fn evaluate_fen(&mut self, fen: &str) -> Result<Evaluation, EngineError> {
        self.calls += 1;
        if self.failing.as_deref() == Some(fen) {
            return Err(EngineError::InvalidResponse("scripted failure".to_string()));
        }
        Ok(self
            .scores
            .get(fen)
            .copied()
            .unwrap_or(Evaluation::Centipawns(0)))
    }
}

fn write_pgn(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("games.pgn");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// FEN after 3. f4 in the first game, scored +300 for Black to move.
///
/// That makes 3. f4 a blunder for White, and 3... Nc6 (which returns the
/// score to 0) a blunder for Black.
fn scripted_with_f4_blunder() -> Scripted {
    let games = PgnParser::default().parse_str(GAMES).unwrap();
    let after_f4 = games[0].moves[4].fen_after.clone();
    assert_eq!(games[0].moves[4].move_uci, "f2f4");

    Scripted {
        scores: HashMap::from([(after_f4, Evaluation::Centipawns(300))]),
        failing: None,
        calls: 0,
    }
}

#[test]
fn pipeline_produces_ranked_recommendations() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_pgn(&dir, GAMES);
    let mut evaluator = scripted_with_f4_blunder();

    let results = analyze_games_with(&pgn, &RecommenderConfig::default(), &mut evaluator).unwrap();

    assert_eq!(results.games_parsed, 3);
    assert_eq!(results.moves_evaluated, 24);
    assert_eq!(evaluator.calls, 48);
    assert_eq!(results.mistake_stats.total_moves, 24);
    assert_eq!(results.mistake_stats.blunders, 2);
    assert_eq!(results.mistake_stats.ok_moves, 22);
    assert!(results.engine.is_none());

    assert_eq!(results.opening_stats[SICILIAN].total_games, 2);
    assert_eq!(results.opening_stats[SICILIAN].wins, 1);
    assert_eq!(results.opening_stats[SICILIAN].losses, 1);
    assert_eq!(results.opening_stats[FRENCH].draws, 1);

    let sicilian = &results.opening_mistake_stats[SICILIAN];
    assert_eq!(sicilian.total_games, 2);
    assert_eq!(sicilian.mistakes.total_moves, 16);
    assert_eq!(sicilian.mistakes.blunders, 2);

    // Only the Sicilian has any mistakes, so it is the single recommendation.
    assert_eq!(results.recommendations.len(), 1);
    let rec = &results.recommendations[0];
    assert_eq!(rec.opening, SICILIAN);
    assert!((rec.blunder_rate - 0.125).abs() < 1e-9);
    assert!((rec.priority_score - 0.375 * 1.32).abs() < 1e-9);
    assert_eq!(rec.recommendation_type, RecommendationType::MinorImprovement);
    assert_eq!(
        rec.study_focus,
        vec![StudyFocus::TacticalAwareness, StudyFocus::Calculation]
    );
    assert!(rec.low_confidence);

    assert_eq!(results.study_plan.total_recommendations, 1);
    assert_eq!(results.study_plan.estimated_time, 2);
    assert_eq!(results.study_plan.priority_openings[0].rank, 1);
}

#[test]
fn evaluation_failures_become_unknown_moves() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_pgn(&dir, GAMES);
    let games = PgnParser::default().parse_str(GAMES).unwrap();
    let mut evaluator = Scripted {
        scores: HashMap::new(),
        failing: Some(games[2].moves[7].fen_after.clone()),
        calls: 0,
    };

    let results = analyze_games_with(&pgn, &RecommenderConfig::default(), &mut evaluator).unwrap();

    assert_eq!(results.moves_evaluated, 24);
    assert_eq!(results.mistake_stats.unknown, 1);
    assert!(results.recommendations.is_empty());
}

#[test]
fn empty_pgn_gives_empty_results() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_pgn(&dir, "");
    let mut evaluator = scripted_with_f4_blunder();

    let results = analyze_games_with(&pgn, &RecommenderConfig::default(), &mut evaluator).unwrap();

    assert_eq!(results, AnalysisResults::default());
    assert_eq!(evaluator.calls, 0);
}

#[test]
fn missing_pgn_is_an_error() {
    let mut evaluator = scripted_with_f4_blunder();
    let result = analyze_games_with(
        "/nonexistent/games.pgn",
        &RecommenderConfig::default(),
        &mut evaluator,
    );
    assert!(matches!(result, Err(PipelineError::Pgn(_))));
}

#[test]
fn missing_pgn_is_reported_before_engine_start() {
    let mut config = RecommenderConfig::default();
    config.engine.stockfish_path = "/nonexistent/stockfish".into();

    let result = analyze_games("/nonexistent/games.pgn", &config);
    assert!(matches!(result, Err(PipelineError::Pgn(_))));
}

#[test]
fn missing_engine_is_reported_for_readable_pgn() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_pgn(&dir, GAMES);
    let mut config = RecommenderConfig::default();
    config.engine.stockfish_path = "/nonexistent/stockfish".into();

    let result = analyze_games(&pgn, &config);
    assert!(matches!(result, Err(PipelineError::Engine(_))));
}

#[test]
fn results_are_written_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_pgn(&dir, GAMES);
    let mut evaluator = scripted_with_f4_blunder();
    let results = analyze_games_with(&pgn, &RecommenderConfig::default(), &mut evaluator).unwrap();

    let out = dir.path().join("out");
    save_results(&results, &out).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(ANALYSIS_FILE)).unwrap()).unwrap();
    assert_eq!(json["games_parsed"], 3);
    assert_eq!(
        json["recommendations"][0]["recommendation_type"],
        "minor_improvement"
    );

    let text = std::fs::read_to_string(out.join(RECOMMENDATIONS_FILE)).unwrap();
    assert!(text.contains("1. B20 Sicilian Defense"));
}
