//! Attendee model - a member registered to one event.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Attendee entity. `(event_id, passbook_number)` is unique.
#[derive(Clone, FromRow)]
pub struct Attendee {
    pub attendee_id: Uuid,
    pub event_id: i64,
    pub passbook_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub contact: Option<String>,
    pub picture: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub vote_otp: String,
    pub registered: bool,
    pub surveyed: bool,
    pub voted: bool,
}

// Hand-written so the one-time code never reaches logs.
impl std::fmt::Debug for Attendee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attendee")
            .field("attendee_id", &self.attendee_id)
            .field("event_id", &self.event_id)
            .field("passbook_number", &self.passbook_number)
            .field("vote_otp", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Member profile returned after a successful claim authorization.
///
/// Carries everything the claim screen shows, never the one-time code.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: Uuid,
    #[schema(example = "PB-001")]
    pub passbook_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub contact: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub picture: Option<String>,
    pub registered: bool,
    pub surveyed: bool,
    pub voted: bool,
}

impl From<Attendee> for MemberProfile {
    fn from(a: Attendee) -> Self {
        Self {
            id: a.attendee_id,
            passbook_number: a.passbook_number,
            first_name: a.first_name,
            middle_name: a.middle_name,
            last_name: a.last_name,
            contact: a.contact,
            birthday: a.birthday,
            picture: a.picture,
            registered: a.registered,
            surveyed: a.surveyed,
            voted: a.voted,
        }
    }
}

/// Identity card used to pre-fill the member lookup.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberMinimalInfo {
    pub id: Uuid,
    pub passbook_number: String,
    pub first_name: String,
    pub last_name: String,
    pub picture: Option<String>,
}

impl From<Attendee> for MemberMinimalInfo {
    fn from(a: Attendee) -> Self {
        Self {
            id: a.attendee_id,
            passbook_number: a.passbook_number,
            first_name: a.first_name,
            last_name: a.last_name,
            picture: a.picture,
        }
    }
}
