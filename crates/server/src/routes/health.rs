//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the data directory is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match tokio::fs::metadata(&state.config().data_dir).await {
        Ok(meta) if meta.is_dir() => StatusCode::OK,
        Ok(_) => {
            tracing::warn!(data_dir = %state.config().data_dir.display(), "Data path is not a directory");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            tracing::warn!(data_dir = %state.config().data_dir.display(), error = %e, "Data directory unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
