//! Opening tags for games and per-opening result counts.

use std::collections::BTreeMap;

use chess_games::Game;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::OpeningDatabase;

/// A game's id and result with its opening label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOpening {
    pub game_id: String,
    pub result: String,
    pub opening: String,
}

/// Tags each game with the label of its opening.
pub fn classify_games(db: &OpeningDatabase, games: &[Game]) -> Vec<GameOpening> {
    games
        .iter()
        .map(|game| {
            let opening = db.classify_label(&game.uci_moves());
            debug!(game_id = %game.game_id, %opening, "classified opening");
            GameOpening {
                game_id: game.game_id.clone(),
                result: game.result.clone(),
                opening,
            }
        })
        .collect()
}

/// Results for one opening, counted from White's side.
///
/// Rates divide by decided games (`wins + losses + draws`); unfinished
/// games only count toward `total_games`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningStats {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl OpeningStats {
    fn record(&mut self, result: &str) {
        self.total_games += 1;
        match result {
            "1-0" => self.wins += 1,
            "0-1" => self.losses += 1,
            "1/2-1/2" => self.draws += 1,
            _ => {}
        }
    }

    fn update_rates(&mut self) {
        let decided = self.wins + self.losses + self.draws;
        if decided == 0 {
            return;
        }
        let decided = decided as f64;
        self.win_rate = self.wins as f64 / decided;
        self.draw_rate = self.draws as f64 / decided;
        self.loss_rate = self.losses as f64 / decided;
    }
}

/// Per-opening result statistics, keyed by opening label.
pub fn opening_stats(games: &[GameOpening]) -> BTreeMap<String, OpeningStats> {
    let mut stats: BTreeMap<String, OpeningStats> = BTreeMap::new();
    for game in games {
        stats.entry(game.opening.clone()).or_default().record(&game.result);
    }
    for entry in stats.values_mut() {
        entry.update_rates();
    }
    stats
}
