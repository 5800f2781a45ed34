//! The acting staff member of an admin request.

use uuid::Uuid;

use super::Role;

/// Resolved once per request from the bearer token and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub organization_id: i64,
    pub branch_id: i64,
}
