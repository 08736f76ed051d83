//! Chess opening study recommender.
//!
//! Runs the batch pipeline over a PGN file:
//! parse games, evaluate every move with an engine, tag mistakes, tag
//! openings, then rank openings into a study plan.
//!
//! The library half is shared with the HTTP server; the `chess-recommender`
//! binary is a thin CLI over [`pipeline::analyze_games`].

pub mod config;
pub mod logging;
pub mod output;
pub mod pipeline;

pub use config::{ApiConfig, ConfigError, EngineConfig, RecommenderConfig};
pub use output::{save_results, ANALYSIS_FILE, RECOMMENDATIONS_FILE};
pub use pipeline::{analyze_games, analyze_games_with, AnalysisResults, PipelineError};
