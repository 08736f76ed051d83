//! Request timing middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Requests slower than this are logged as warnings.
const SLOW_REQUEST_MS: u128 = 500;

/// Logs method, path, status and duration of every request.
///
/// ```ignore
/// let app = Router::new()
///     .route("/jobs", get(list_jobs))
///     .layer(axum::middleware::from_fn(timing_layer));
/// ```
pub async fn timing_layer(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if duration_ms > SLOW_REQUEST_MS {
        tracing::warn!(%method, %path, status, duration_ms, "Slow request");
    } else {
        tracing::info!(%method, %path, status, duration_ms, "Request completed");
    }

    response
}
