use axum::{extract::State, http::header, response::IntoResponse};
use service_core::error::AppError;

use crate::AppState;

/// Prometheus text exposition of the process metrics.
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state.metrics.as_ref().ok_or(AppError::ServiceUnavailable)?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
