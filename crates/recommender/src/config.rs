//! TOML configuration for the recommender and its HTTP server.

use std::path::{Path, PathBuf};

use chess_analysis::{EngineSettings, InvalidThresholds, MistakeThresholds};
use chess_games::ParseLimits;
use serde::{Deserialize, Serialize};
use study_plan::RecommendationSettings;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Thresholds(#[from] InvalidThresholds),
    /// A value is outside its allowed range.
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// `[engine]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the Stockfish binary; a bare name is looked up on `PATH`.
    pub stockfish_path: PathBuf,
    pub evaluation_depth: u32,
    /// Seconds per position.
    pub time_limit: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stockfish_path: PathBuf::from("stockfish"),
            evaluation_depth: 15,
            time_limit: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            stockfish_path: self.stockfish_path.clone(),
            evaluation_depth: self.evaluation_depth,
            time_limit_ms: (self.time_limit * 1000.0).round() as u64,
        }
    }
}

/// `[api]` section, read by the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Analyses allowed to run at the same time.
    pub max_workers: usize,
    /// Seconds before a running analysis is marked failed.
    pub job_timeout: u64,
    /// Where uploads and the job database live.
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_workers: 4,
            job_timeout: 1800,
            data_dir: PathBuf::from("data/jobs"),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Complete configuration. Every section and field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub analysis: ParseLimits,
    pub engine: EngineConfig,
    pub mistake_thresholds: MistakeThresholds,
    pub recommendation: RecommendationSettings,
    pub api: ApiConfig,
}

impl RecommenderConfig {
    /// Default file name looked up in the working directory.
    pub const DEFAULT_PATH: &'static str = "config.toml";

    /// Loads and validates the configuration at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if the file contains invalid TOML, or a
    /// validation error from [`Self::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mistake_thresholds.validate()?;
        if self.engine.time_limit.is_nan() || self.engine.time_limit <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.time_limit",
                reason: format!("must be positive, got {}", self.engine.time_limit),
            });
        }
        if self.engine.evaluation_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.evaluation_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.api.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.max_workers",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = RecommenderConfig::from_toml(
            r#"
[analysis]
min_moves = 10
max_moves = 40
max_games = 500

[engine]
stockfish_path = "/usr/games/stockfish"
evaluation_depth = 20
time_limit = 0.5

[mistake_thresholds]
blunder = -300
mistake = -150
inaccuracy = -60
ok = 0

[recommendation]
top_openings = 3
min_games_per_opening = 2
confidence_threshold = 0.5

[api]
host = "127.0.0.1"
port = 9000
max_workers = 2
job_timeout = 60
data_dir = "/tmp/jobs"
"#,
        )
        .unwrap();

        assert_eq!(config.analysis.min_moves, 10);
        assert_eq!(config.analysis.max_games, 500);
        assert_eq!(config.engine.stockfish_path, PathBuf::from("/usr/games/stockfish"));
        assert_eq!(config.engine.settings().time_limit_ms, 500);
        assert_eq!(config.engine.settings().evaluation_depth, 20);
        assert_eq!(config.mistake_thresholds.blunder, -300);
        assert_eq!(config.recommendation.top_openings, 3);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.data_dir, PathBuf::from("/tmp/jobs"));
        assert_eq!(config.api.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = RecommenderConfig::from_toml("[engine]\nevaluation_depth = 8\n").unwrap();

        assert_eq!(config.engine.evaluation_depth, 8);
        assert_eq!(config.engine.time_limit, 1.0);
        assert_eq!(config.analysis, ParseLimits::default());
        assert_eq!(config.mistake_thresholds, MistakeThresholds::default());
        assert_eq!(config.recommendation, RecommendationSettings::default());
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 8000);
        assert_eq!(config.api.max_workers, 4);
        assert_eq!(config.api.job_timeout, 1800);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecommenderConfig::load(dir.path().join("config.toml")).unwrap();
        assert_eq!(config, RecommenderConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine\nevaluation_depth = ").unwrap();

        assert!(matches!(
            RecommenderConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let result = RecommenderConfig::from_toml("[mistake_thresholds]\nblunder = -20\n");
        assert!(matches!(result, Err(ConfigError::Thresholds(_))));
    }

    #[test]
    fn test_non_positive_time_limit_rejected() {
        let result = RecommenderConfig::from_toml("[engine]\ntime_limit = 0.0\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "engine.time_limit",
                ..
            })
        ));
    }
}
