//! HTTP job API for the chess opening study recommender.
//!
//! Clients upload a PGN file to `POST /jobs`; the analysis pipeline runs in
//! the background and its results are fetched from `GET /jobs/:id`. Jobs are
//! kept in SQLite so they survive restarts.

pub mod api;
pub mod db;
pub mod middleware;
pub mod models;
pub mod repo;
pub mod worker;

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use db::DbPool;
use recommender::{analyze_games, AnalysisResults, PipelineError, RecommenderConfig};
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};

/// Runs the analysis pipeline for one uploaded file.
pub type Analyzer =
    Arc<dyn Fn(&Path, &RecommenderConfig) -> Result<AnalysisResults, PipelineError> + Send + Sync>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<RecommenderConfig>,
    /// Caps concurrent analyses at `api.max_workers`.
    pub workers: Arc<Semaphore>,
    pub analyzer: Analyzer,
}

impl AppState {
    /// State that analyzes uploads with Stockfish.
    pub fn new(db: DbPool, config: RecommenderConfig) -> Self {
        let analyzer: Analyzer = Arc::new(|path: &Path, config: &RecommenderConfig| {
            analyze_games(path, config)
        });
        Self::with_analyzer(db, config, analyzer)
    }

    pub fn with_analyzer(db: DbPool, config: RecommenderConfig, analyzer: Analyzer) -> Self {
        Self {
            db,
            workers: Arc::new(Semaphore::new(config.api.max_workers)),
            config: Arc::new(config),
            analyzer,
        }
    }
}

/// Builds the router with CORS, upload size limit and request timing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let upload_limit = state.config.api.max_upload_bytes;

    Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health))
        .route(
            "/jobs",
            get(api::jobs::list_jobs).post(api::jobs::create_job),
        )
        .route(
            "/jobs/:id",
            get(api::jobs::get_job).delete(api::jobs::delete_job),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(axum::middleware::from_fn(middleware::timing_layer))
        .layer(cors)
        .with_state(state)
}
