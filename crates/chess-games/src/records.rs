//! Flat per-move rows joined with their game's metadata.

use serde::{Deserialize, Serialize};

use crate::game::{Color, Game};

/// One move of one game, with the game headers copied alongside.
///
/// The evaluation and mistake columns start empty and are filled in by later
/// pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub game_id: String,
    pub white_player: String,
    pub black_player: String,
    pub result: String,
    pub date: Option<String>,
    pub event: Option<String>,
    pub site: Option<String>,
    pub move_number: u32,
    pub player: Color,
    pub fen_before: String,
    pub fen_after: String,
    pub move_uci: String,
    pub move_san: String,
    pub evaluation_before: Option<i32>,
    pub evaluation_after: Option<i32>,
    pub mistake_type: Option<String>,
}

/// Flattens games into move rows, preserving game and move order.
pub fn games_to_records(games: &[Game]) -> Vec<MoveRecord> {
    games
        .iter()
        .flat_map(|game| {
            game.moves.iter().map(move |mv| MoveRecord {
                game_id: mv.game_id.clone(),
                white_player: game.white_player.clone(),
                black_player: game.black_player.clone(),
                result: game.result.clone(),
                date: game.date.clone(),
                event: game.event.clone(),
                site: game.site.clone(),
                move_number: mv.move_number,
                player: mv.player,
                fen_before: mv.fen_before.clone(),
                fen_after: mv.fen_after.clone(),
                move_uci: mv.move_uci.clone(),
                move_san: mv.move_san.clone(),
                evaluation_before: None,
                evaluation_after: None,
                mistake_type: None,
            })
        })
        .collect()
}
