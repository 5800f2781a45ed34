use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use service_core::error::AppError;

use crate::services::ClaimError;

/// Positive event id from the `:id` path segment.
///
/// Non-numeric, overflowing and non-positive ids are all a 400 with the usual
/// JSON error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for EventId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || AppError::from(ClaimError::ValidationError("Invalid event id".to_string()));

        let Path(event_id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected event id");
                invalid()
            })?;

        if event_id <= 0 {
            return Err(invalid());
        }

        Ok(EventId(event_id))
    }
}
