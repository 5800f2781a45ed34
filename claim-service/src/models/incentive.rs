//! Incentive assignment model - items a staff member hands out at an event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Role, StaffUser};

/// Incentive assignment entity.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveAssignment {
    #[serde(rename = "id")]
    pub assignment_id: Uuid,
    pub event_id: i64,
    pub user_id: Uuid,
    pub incentive_name: String,
    pub assigned_quantity: i32,
    pub created_utc: DateTime<Utc>,
}

/// A staff user together with their assignments for one event.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithAssignedIncentives {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub organization_id: i64,
    pub branch_id: i64,
    pub assigned_incentive: Vec<IncentiveAssignment>,
}

impl UserWithAssignedIncentives {
    pub fn new(user: StaffUser, assigned_incentive: Vec<IncentiveAssignment>) -> Self {
        Self {
            role: user.role(),
            id: user.user_id,
            name: user.display_name,
            email: user.email,
            organization_id: user.organization_id,
            branch_id: user.branch_id,
            assigned_incentive,
        }
    }
}
