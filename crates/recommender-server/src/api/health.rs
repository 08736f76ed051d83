//! Health and service information.

use std::collections::BTreeMap;

use axum::Json;

use crate::models::{HealthResponse, ServiceInfo};
use crate::repo::jobs::now_timestamp;

pub const SERVICE_NAME: &str = "chess-opening-recommender";

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: now_timestamp(),
    })
}

/// `GET /`
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BTreeMap::from([
            ("POST /jobs", "Upload a PGN file and start an analysis job"),
            ("GET /jobs", "List all jobs, newest first"),
            ("GET /jobs/:id", "Job status and results"),
            ("DELETE /jobs/:id", "Delete a job and its upload"),
            ("GET /health", "Health check"),
        ]),
    })
}
