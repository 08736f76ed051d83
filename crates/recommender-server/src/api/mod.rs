//! API handlers for the recommender server.

pub mod health;
pub mod jobs;

use std::fmt::Display;

use axum::http::StatusCode;
use tracing::error;

/// Logs `e` and maps it to a 500.
fn internal_error(e: impl Display) -> StatusCode {
    error!(error = %e, "Request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}
