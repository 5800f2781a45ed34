//! PostgreSQL-backed `ClaimStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{ClaimError, ClaimStore, VisibilityFilter};
use crate::models::{
    Attendee, Event, IncentiveAssignment, StaffUser, UserWithAssignedIncentives,
};

const ATTENDEE_COLUMNS: &str = "attendee_id, event_id, passbook_number, first_name, middle_name, \
     last_name, contact, picture, birthday, vote_otp, registered, surveyed, voted";

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClaimStore for Database {
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, ClaimError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, organization_id, branch_id, title, event_date, location,
                   require_birthday_verification, deleted
            FROM events
            WHERE event_id = $1 AND deleted = FALSE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_attendee_by_passbook(
        &self,
        event_id: i64,
        passbook_number: &str,
    ) -> Result<Option<Attendee>, ClaimError> {
        let sql = format!(
            "SELECT {} FROM event_attendees WHERE event_id = $1 AND passbook_number = $2",
            ATTENDEE_COLUMNS
        );

        let attendee = sqlx::query_as::<_, Attendee>(&sql)
            .bind(event_id)
            .bind(passbook_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attendee)
    }

    async fn find_attendee_by_id(
        &self,
        event_id: i64,
        attendee_id: Uuid,
    ) -> Result<Option<Attendee>, ClaimError> {
        let sql = format!(
            "SELECT {} FROM event_attendees WHERE event_id = $1 AND attendee_id = $2",
            ATTENDEE_COLUMNS
        );

        let attendee = sqlx::query_as::<_, Attendee>(&sql)
            .bind(event_id)
            .bind(attendee_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attendee)
    }

    async fn list_users_with_assigned_incentives(
        &self,
        event_id: i64,
        filter: &VisibilityFilter,
    ) -> Result<Vec<UserWithAssignedIncentives>, ClaimError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT user_id, display_name, email, role_code, organization_id, branch_id, deleted \
             FROM users WHERE ",
        );
        filter.push_sql(&mut qb);
        qb.push(" ORDER BY display_name");

        let users: Vec<StaffUser> = qb.build_query_as().fetch_all(&self.pool).await?;
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = users.iter().map(|u| u.user_id).collect();
        let assignments = sqlx::query_as::<_, IncentiveAssignment>(
            r#"
            SELECT assignment_id, event_id, user_id, incentive_name, assigned_quantity, created_utc
            FROM incentive_assignments
            WHERE event_id = $1 AND user_id = ANY($2)
            ORDER BY created_utc
            "#,
        )
        .bind(event_id)
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_user: HashMap<Uuid, Vec<IncentiveAssignment>> = HashMap::new();
        for assignment in assignments {
            by_user.entry(assignment.user_id).or_default().push(assignment);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let assigned = by_user.remove(&user.user_id).unwrap_or_default();
                UserWithAssignedIncentives::new(user, assigned)
            })
            .collect())
    }

    async fn health_check(&self) -> Result<(), anyhow::Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                anyhow::anyhow!("Database health check failed: {}", e)
            })?;
        Ok(())
    }
}
