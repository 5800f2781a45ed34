use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    middleware::AdminPrincipal, models::UserWithAssignedIncentives, utils::EventId, AppState,
};

/// Staff visible to the caller, with their incentive assignments for the event
#[utoipa::path(
    get,
    path = "/api/v1/admin/event/{id}/incentives/user-with-assigned",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Visible staff with assignments", body = [UserWithAssignedIncentives]),
        (status = 400, description = "Invalid event id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid principal", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn users_with_assigned(
    State(state): State<AppState>,
    EventId(event_id): EventId,
    AdminPrincipal(principal): AdminPrincipal,
) -> Result<Json<Vec<UserWithAssignedIncentives>>, AppError> {
    let users = state
        .incentives
        .users_with_assigned(&principal, event_id)
        .await?;
    Ok(Json(users))
}
