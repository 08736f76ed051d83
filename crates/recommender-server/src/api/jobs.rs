//! Job API handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::internal_error;
use crate::models::{JobResponse, JobResult, MessageResponse};
use crate::repo::JobRepo;
use crate::worker::spawn_analysis;
use crate::AppState;

/// Multipart field carrying the PGN upload.
pub const UPLOAD_FIELD: &str = "pgn_file";

fn is_pgn_filename(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pgn")
}

/// Upload a PGN file and start analyzing it.
///
/// # Endpoint
///
/// `POST /jobs` (multipart, field `pgn_file`)
///
/// # Response
///
/// - `200 OK`: the new job, status `pending`
/// - `400 Bad Request`: no `pgn_file` field, or its filename does not end in `.pgn`
/// - `413 Payload Too Large`: upload exceeds `api.max_upload_bytes`
pub async fn create_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<JobResponse>, StatusCode> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| e.status())? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if !is_pgn_filename(&filename) {
            warn!(%filename, "Rejected upload without .pgn extension");
            return Err(StatusCode::BAD_REQUEST);
        }
        let data = field.bytes().await.map_err(|e| e.status())?;
        upload = Some((filename, data));
        break;
    }
    let (filename, data) = upload.ok_or(StatusCode::BAD_REQUEST)?;

    let job_id = Uuid::new_v4().to_string();
    let data_dir = &state.config.api.data_dir;
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(internal_error)?;
    let file_path = data_dir.join(format!("{job_id}.pgn"));
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(internal_error)?;

    let job = JobRepo::new(state.db.clone())
        .create(&job_id, &filename, &file_path)
        .map_err(internal_error)?;
    info!(job_id = %job.id, %filename, bytes = data.len(), "Job created");

    spawn_analysis(state.clone(), job.id.clone(), file_path);
    Ok(Json(job.response()))
}

/// Status and, once finished, results or error of one job.
///
/// # Endpoint
///
/// `GET /jobs/:id`
///
/// # Response
///
/// - `200 OK`: the job result
/// - `404 Not Found`: unknown job
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobResult>, StatusCode> {
    JobRepo::new(state.db.clone())
        .get(&id)
        .map_err(internal_error)?
        .map(|job| Json(JobResult::from(job)))
        .ok_or(StatusCode::NOT_FOUND)
}

/// All jobs, newest first.
///
/// # Endpoint
///
/// `GET /jobs`
pub async fn list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobResponse>>, StatusCode> {
    let jobs = JobRepo::new(state.db.clone())
        .list()
        .map_err(internal_error)?;
    Ok(Json(jobs.iter().map(|job| job.response()).collect()))
}

/// Delete a job and its uploaded file.
///
/// # Endpoint
///
/// `DELETE /jobs/:id`
///
/// # Response
///
/// - `200 OK`: job deleted; a missing upload file is only logged
/// - `404 Not Found`: unknown job
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let repo = JobRepo::new(state.db.clone());
    let job = repo
        .get(&id)
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if let Err(e) = tokio::fs::remove_file(&job.file_path).await {
        warn!(job_id = %id, path = %job.file_path.display(), error = %e, "Failed to remove upload");
    }
    if !repo.delete(&id).map_err(internal_error)? {
        return Err(StatusCode::NOT_FOUND);
    }
    info!(job_id = %id, "Job deleted");

    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}
