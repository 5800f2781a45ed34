//! Event model - a gathering owned by an organization branch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Event entity.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub event_id: i64,
    pub organization_id: i64,
    pub branch_id: i64,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub require_birthday_verification: bool,
    pub deleted: bool,
}

/// Public view of an event.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[schema(example = 7)]
    pub id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Clients default to the birthday form when set.
    pub require_birthday_verification: bool,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.event_id,
            title: e.title,
            date: e.event_date,
            location: e.location,
            require_birthday_verification: e.require_birthday_verification,
        }
    }
}
