//! JSON persistence for parsed games.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::game::Game;
use crate::parser::PgnError;

/// Writes `games` as JSON to `path`, creating parent directories.
pub fn save_processed_games(games: &[Game], path: impl AsRef<Path>) -> Result<(), PgnError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(games)?;
    fs::write(path, json)?;
    info!("Saved {} processed games to {}", games.len(), path.display());
    Ok(())
}

/// Reads games previously written by [`save_processed_games`].
pub fn load_processed_games(path: impl AsRef<Path>) -> Result<Vec<Game>, PgnError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let games: Vec<Game> = serde_json::from_str(&data)?;
    info!("Loaded {} processed games from {}", games.len(), path.display());
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("games.json");
        let games = vec![Game::new("game_0", "A", "B", "1/2-1/2")];

        save_processed_games(&games, &path).unwrap();
        let loaded = load_processed_games(&path).unwrap();

        assert_eq!(loaded, games);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_processed_games(dir.path().join("absent.json"));
        assert!(matches!(result, Err(PgnError::Io(_))));
    }
}
