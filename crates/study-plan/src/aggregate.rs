//! Mistake statistics per opening.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chess_analysis::{mistakes_by_opening, ClassifiedMove, MistakeStats};
use chess_openings::{GameOpening, UNKNOWN_OPENING};
use serde::{Deserialize, Serialize};

/// Move-level mistake statistics for one opening plus its game count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningMistakeStats {
    /// Distinct games that contributed moves.
    pub total_games: usize,
    #[serde(flatten)]
    pub mistakes: MistakeStats,
}

/// Groups classified moves by the opening of their game.
///
/// Moves whose game is not in `games` fall under [`UNKNOWN_OPENING`].
pub fn aggregate_opening_mistakes(
    moves: &[ClassifiedMove],
    games: &[GameOpening],
) -> BTreeMap<String, OpeningMistakeStats> {
    let opening_of: HashMap<&str, &str> = games
        .iter()
        .map(|g| (g.game_id.as_str(), g.opening.as_str()))
        .collect();
    let label_of = |mv: &ClassifiedMove| {
        opening_of
            .get(mv.game_move.game_id.as_str())
            .map(|label| (*label).to_string())
    };

    let mut games_per_opening: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for mv in moves {
        let label = label_of(mv).unwrap_or_else(|| UNKNOWN_OPENING.to_string());
        games_per_opening
            .entry(label)
            .or_default()
            .insert(mv.game_move.game_id.as_str());
    }

    mistakes_by_opening(moves, label_of)
        .into_iter()
        .map(|(label, mistakes)| {
            let total_games = games_per_opening.get(&label).map_or(0, BTreeSet::len);
            (
                label,
                OpeningMistakeStats {
                    total_games,
                    mistakes,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analysis::MistakeType;
    use chess_games::{Color, GameMove};

    fn classified(game_id: &str, mistake_type: MistakeType) -> ClassifiedMove {
        ClassifiedMove {
            game_move: GameMove {
                game_id: game_id.to_string(),
                move_number: 1,
                player: Color::White,
                fen_before: String::new(),
                fen_after: String::new(),
                move_uci: "e2e4".to_string(),
                move_san: "e4".to_string(),
            },
            evaluation_before: Some(0),
            evaluation_after: Some(0),
            mistake_type,
        }
    }

    fn opening(game_id: &str, label: &str) -> GameOpening {
        GameOpening {
            game_id: game_id.to_string(),
            result: "1-0".to_string(),
            opening: label.to_string(),
        }
    }

    #[test]
    fn test_aggregate_counts_moves_and_games() {
        let moves = vec![
            classified("game_0", MistakeType::Blunder),
            classified("game_0", MistakeType::Ok),
            classified("game_1", MistakeType::Mistake),
            classified("game_1", MistakeType::Inaccuracy),
            classified("game_2", MistakeType::Ok),
        ];
        let games = vec![
            opening("game_0", "B20 Sicilian Defense"),
            opening("game_1", "B20 Sicilian Defense"),
            opening("game_2", "A10 English Opening"),
        ];

        let stats = aggregate_opening_mistakes(&moves, &games);

        let sicilian = &stats["B20 Sicilian Defense"];
        assert_eq!(sicilian.total_games, 2);
        assert_eq!(sicilian.mistakes.total_moves, 4);
        assert_eq!(sicilian.mistakes.blunders, 1);
        assert_eq!(sicilian.mistakes.mistakes, 1);
        assert_eq!(sicilian.mistakes.inaccuracies, 1);
        assert_eq!(sicilian.mistakes.ok_moves, 1);
        assert!((sicilian.mistakes.blunder_rate - 0.25).abs() < f64::EPSILON);

        let english = &stats["A10 English Opening"];
        assert_eq!(english.total_games, 1);
        assert!((english.mistakes.ok_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmatched_game_is_unknown_opening() {
        let stats = aggregate_opening_mistakes(&[classified("game_9", MistakeType::Ok)], &[]);
        assert_eq!(stats[UNKNOWN_OPENING].total_games, 1);
        assert_eq!(stats[UNKNOWN_OPENING].mistakes.total_moves, 1);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let stats = aggregate_opening_mistakes(
            &[classified("game_0", MistakeType::Blunder)],
            &[opening("game_0", "C00 French Defense")],
        );
        let json = serde_json::to_value(&stats["C00 French Defense"]).unwrap();
        assert_eq!(json["total_games"], 1);
        assert_eq!(json["blunders"], 1);
        assert_eq!(json["blunder_rate"], 1.0);
    }
}
