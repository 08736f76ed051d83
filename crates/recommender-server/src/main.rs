//! Recommender Server
//!
//! Serves the job API on `api.host:api.port` from the config file named by
//! `RECOMMENDER_CONFIG` (default `config.toml`).

use std::net::SocketAddr;

use anyhow::Context;
use recommender::RecommenderConfig;
use recommender_server::repo::JobRepo;
use recommender_server::{create_router, db, AppState};
use tracing_subscriber::EnvFilter;

/// Name of the job database inside `api.data_dir`.
const DB_FILE: &str = "jobs.db";

const INTERRUPTED_JOB_ERROR: &str = "Server restarted before the analysis finished";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("RECOMMENDER_CONFIG")
        .unwrap_or_else(|_| RecommenderConfig::DEFAULT_PATH.to_string());
    let config = RecommenderConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    let data_dir = config.api.data_dir.clone();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let db = db::init_db(data_dir.join(DB_FILE)).context("Failed to initialize database")?;
    let abandoned = JobRepo::new(db.clone())
        .fail_unfinished(INTERRUPTED_JOB_ERROR)
        .context("Failed to clean up unfinished jobs")?;
    if abandoned > 0 {
        tracing::warn!("Marked {} unfinished jobs from a previous run as failed", abandoned);
    }

    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port)
        .parse()
        .context("Invalid api.host/api.port")?;
    let app = create_router(AppState::new(db, config));

    tracing::info!("Server running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
