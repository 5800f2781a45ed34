//! Staff user model and the closed role set.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Platform roles, stored as `role_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Root,
    CoopRoot,
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::CoopRoot => "coop_root",
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Role::Root),
            "coop_root" => Ok(Role::CoopRoot),
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff user entity.
#[derive(Debug, Clone, FromRow)]
pub struct StaffUser {
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role_code: String,
    pub organization_id: i64,
    pub branch_id: i64,
    pub deleted: bool,
}

impl StaffUser {
    /// Parsed role; `None` for codes outside the closed set.
    pub fn role(&self) -> Option<Role> {
        self.role_code.parse().ok()
    }
}
