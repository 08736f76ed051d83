//! PGN reading built on `pgn-reader`, with SAN replay through `shakmaty`.

use std::fs::File;
use std::io::{self, Read};
use std::mem;
use std::path::Path;

use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus as CanonicalSan;
use shakmaty::{CastlingMode, Chess, EnPassantMode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::game::{Color, Game, GameMove};

/// Errors that abort a whole parse.
///
/// Problems inside a single game never surface here; such games are skipped.
/// `Json` only comes from the processed-game store.
#[derive(Debug, Error)]
pub enum PgnError {
    #[error("failed to read PGN input: {0}")]
    Io(#[from] io::Error),

    #[error("invalid processed games file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Limits applied while reading a PGN collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseLimits {
    /// Games with fewer recorded plies are discarded.
    pub min_moves: usize,
    /// Plies recorded per game; later moves are ignored.
    pub max_moves: usize,
    /// Parsing stops once this many games were accepted.
    pub max_games: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            min_moves: 5,
            max_moves: 50,
            max_games: 100,
        }
    }
}

/// Reads PGN text into [`Game`]s.
#[derive(Debug, Clone, Default)]
pub struct PgnParser {
    limits: ParseLimits,
}

impl PgnParser {
    pub fn new(limits: ParseLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ParseLimits {
        &self.limits
    }

    /// Parses every acceptable game in the file at `path`.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<Game>, PgnError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let games = self.parse_reader(file)?;
        info!("Parsed {} games from {}", games.len(), path.display());
        Ok(games)
    }

    pub fn parse_str(&self, pgn: &str) -> Result<Vec<Game>, PgnError> {
        self.parse_reader(pgn.as_bytes())
    }

    /// Parses games from any reader until input ends or `max_games` is reached.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<Game>, PgnError> {
        let mut reader = BufferedReader::new(reader);
        let mut visitor = GameVisitor::new(self.limits.max_moves);
        let mut games = Vec::new();
        let mut index = 0usize;

        loop {
            if games.len() >= self.limits.max_games {
                info!("Reached maximum games limit: {}", self.limits.max_games);
                break;
            }

            visitor.game_id = format!("game_{}", games.len());
            let Some(parsed) = reader.read_game(&mut visitor)? else {
                break;
            };
            index += 1;

            match parsed {
                Ok(game) if game.moves.len() >= self.limits.min_moves => games.push(game),
                Ok(game) => debug!(
                    "Discarding game #{index}: {} plies is below the minimum of {}",
                    game.moves.len(),
                    self.limits.min_moves
                ),
                Err(reason) => warn!("Failed to parse game #{index}: {reason}"),
            }
        }

        Ok(games)
    }
}

/// Visitor collecting one game at a time.
///
/// A game that hits an illegal move or bad setup yields `Err` with the reason.
struct GameVisitor {
    max_moves: usize,
    game_id: String,
    game: Game,
    setup_fen: Option<String>,
    position: Chess,
    error: Option<String>,
}

impl GameVisitor {
    fn new(max_moves: usize) -> Self {
        Self {
            max_moves,
            game_id: String::new(),
            game: Game::new("", "Unknown", "Unknown", "*"),
            setup_fen: None,
            position: Chess::default(),
            error: None,
        }
    }

    fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }
}

impl Visitor for GameVisitor {
    type Result = Result<Game, String>;

    fn begin_game(&mut self) {
        self.game = Game::new(self.game_id.clone(), "Unknown", "Unknown", "*");
        self.setup_fen = None;
        self.position = Chess::default();
        self.error = None;
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let value = value.decode_utf8_lossy().into_owned();
        match key {
            b"White" => self.game.white_player = value,
            b"Black" => self.game.black_player = value,
            b"Result" => self.game.result = value,
            b"Date" => self.game.date = Some(value),
            b"Event" => self.game.event = Some(value),
            b"Site" => self.game.site = Some(value),
            b"FEN" => self.setup_fen = Some(value),
            _ => {}
        }
    }

    fn end_headers(&mut self) -> Skip {
        if let Some(fen) = self.setup_fen.take() {
            let setup = Fen::from_ascii(fen.as_bytes())
                .map_err(|e| e.to_string())
                .and_then(|fen| {
                    fen.into_position::<Chess>(CastlingMode::Standard)
                        .map_err(|e| e.to_string())
                });
            match setup {
                Ok(position) => self.position = position,
                Err(e) => {
                    self.error = Some(format!("invalid FEN header {fen:?}: {e}"));
                    return Skip(true);
                }
            }
        }
        Skip(false)
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.error.is_some() || self.game.moves.len() >= self.max_moves {
            return;
        }

        let mv = match san_plus.san.to_move(&self.position) {
            Ok(mv) => mv,
            Err(e) => {
                self.error = Some(format!("illegal move {san_plus}: {e}"));
                return;
            }
        };

        let ply = self.game.moves.len();
        let fen_before = self.fen();
        let move_uci = mv.to_uci(CastlingMode::Standard).to_string();
        let move_san = CanonicalSan::from_move_and_play_unchecked(&mut self.position, &mv);
        let fen_after = self.fen();

        self.game.moves.push(GameMove {
            game_id: self.game.game_id.clone(),
            move_number: (ply / 2 + 1) as u32,
            player: if ply % 2 == 0 { Color::White } else { Color::Black },
            fen_before,
            fen_after,
            move_uci,
            move_san: move_san.to_string(),
        });
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        let game = mem::replace(&mut self.game, Game::new("", "Unknown", "Unknown", "*"));
        match self.error.take() {
            Some(reason) => Err(reason),
            None => Ok(game),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::STARTING_FEN;

    const SCHOLARS_MATE: &str = r#"[Event "Casual"]
[Site "Local"]
[Date "2024.01.01"]
[White "Alice"]
[Black "Bob"]
[Result "1-0"]

1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0
"#;

    fn lenient() -> PgnParser {
        PgnParser::new(ParseLimits {
            min_moves: 1,
            max_moves: 50,
            max_games: 100,
        })
    }

    #[test]
    fn test_parse_headers_and_moves() {
        let games = lenient().parse_str(SCHOLARS_MATE).unwrap();
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.game_id, "game_0");
        assert_eq!(game.white_player, "Alice");
        assert_eq!(game.black_player, "Bob");
        assert_eq!(game.result, "1-0");
        assert_eq!(game.date.as_deref(), Some("2024.01.01"));
        assert_eq!(game.event.as_deref(), Some("Casual"));
        assert_eq!(game.site.as_deref(), Some("Local"));
        assert_eq!(game.moves.len(), 7);
    }

    #[test]
    fn test_move_fields() {
        let games = lenient().parse_str(SCHOLARS_MATE).unwrap();
        let moves = &games[0].moves;

        assert_eq!(moves[0].fen_before, STARTING_FEN);
        assert_eq!(moves[0].move_uci, "e2e4");
        assert_eq!(moves[0].move_san, "e4");
        assert_eq!(moves[0].player, Color::White);
        assert_eq!(moves[0].move_number, 1);

        assert_eq!(moves[1].player, Color::Black);
        assert_eq!(moves[1].move_number, 1);
        assert_eq!(moves[1].fen_before, moves[0].fen_after);

        let last = &moves[6];
        assert_eq!(last.move_uci, "h5f7");
        assert_eq!(last.move_san, "Qxf7#");
        assert_eq!(last.move_number, 4);
        assert_eq!(last.game_id, "game_0");
    }

    #[test]
    fn test_missing_headers_use_defaults() {
        let games = lenient().parse_str("1. d4 d5 2. c4 *\n").unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].white_player, "Unknown");
        assert_eq!(games[0].black_player, "Unknown");
        assert_eq!(games[0].result, "*");
        assert!(games[0].date.is_none());
    }

    #[test]
    fn test_variations_are_skipped() {
        let pgn = "1. e4 (1. d4 d5) 1... e5 {a comment} 2. Nf3 *\n";
        let games = lenient().parse_str(pgn).unwrap();
        let uci = games[0].uci_moves();
        assert_eq!(uci, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn test_max_moves_truncates() {
        let parser = PgnParser::new(ParseLimits {
            min_moves: 1,
            max_moves: 3,
            max_games: 10,
        });
        let games = parser.parse_str(SCHOLARS_MATE).unwrap();
        assert_eq!(games[0].moves.len(), 3);
    }

    #[test]
    fn test_illegal_move_skips_game() {
        let pgn = "1. e4 e5 2. Ke3 *\n\n1. d4 d5 *\n";
        let games = lenient().parse_str(pgn).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, "game_0");
        assert_eq!(games[0].uci_moves(), vec!["d2d4", "d7d5"]);
    }

    #[test]
    fn test_empty_input() {
        let games = PgnParser::default().parse_str("").unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn test_fen_header_sets_start_position() {
        let pgn = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"]

1. e4 Kd7 *
"#;
        let games = lenient().parse_str(pgn).unwrap();
        assert_eq!(games[0].moves[0].fen_before, "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(games[0].uci_moves(), vec!["e2e4", "e8d7"]);
    }
}
