//! Background execution of analysis jobs.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::repo::JobRepo;
use crate::AppState;

/// Runs the job in the background; see [`run_analysis`].
pub fn spawn_analysis(state: AppState, job_id: String, pgn_path: PathBuf) -> JoinHandle<()> {
    tokio::spawn(run_analysis(state, job_id, pgn_path))
}

/// Waits for a worker slot, then analyzes `pgn_path` on the blocking pool.
///
/// The job stays pending until a slot is free, then moves to processing and
/// ends up completed or failed. A run exceeding `api.job_timeout` is recorded
/// as failed; the blocking task cannot be cancelled and keeps its slot until
/// it returns.
pub async fn run_analysis(state: AppState, job_id: String, pgn_path: PathBuf) {
    let Ok(permit) = state.workers.clone().acquire_owned().await else {
        warn!(job_id = %job_id, "Worker pool closed, job not started");
        return;
    };

    let repo = JobRepo::new(state.db.clone());
    match repo.set_processing(&job_id) {
        Ok(true) => info!(job_id = %job_id, "Analysis started"),
        Ok(false) => {
            info!(job_id = %job_id, "Job deleted before it started");
            return;
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "Failed to mark job as processing");
            return;
        }
    }

    let start = Instant::now();
    let timeout_secs = state.config.api.job_timeout;
    let analyzer = state.analyzer.clone();
    let config = state.config.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        analyzer(&pgn_path, &config)
    });

    let outcome = match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(Ok(Ok(results))) => Ok(results),
        Ok(Ok(Err(e))) => Err(e.to_string()),
        Ok(Err(e)) => Err(format!("Analysis task failed: {e}")),
        Err(_) => Err(format!("Analysis timed out after {timeout_secs} seconds")),
    };
    let elapsed = start.elapsed().as_secs_f64();

    let stored = match outcome {
        Ok(results) => {
            info!(
                job_id = %job_id,
                games = results.games_parsed,
                recommendations = results.recommendations.len(),
                elapsed_s = elapsed,
                "Analysis completed"
            );
            repo.complete(&job_id, &results, elapsed)
        }
        Err(message) => {
            error!(job_id = %job_id, error = %message, "Analysis failed");
            repo.fail(&job_id, &message, elapsed)
        }
    };
    if let Err(e) = stored {
        error!(job_id = %job_id, error = %e, "Failed to store job outcome");
    }
}
