use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{models::EventResponse, services::ClaimError, utils::EventId, AppState};

/// Public summary of an event
#[utoipa::path(
    get,
    path = "/api/v1/public/event/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event summary", body = EventResponse),
        (status = 400, description = "Invalid event id", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Event"
)]
pub async fn get_event(
    State(state): State<AppState>,
    EventId(event_id): EventId,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .store
        .find_event(event_id)
        .await?
        .ok_or(ClaimError::EventNotFound)?;

    Ok(Json(EventResponse::from(event)))
}
