//! Admin view of staff and their incentive assignments for an event.

use std::sync::Arc;

use super::{resolve_visibility_filter, ClaimError, ClaimStore};
use crate::models::{Principal, UserWithAssignedIncentives};

#[derive(Clone)]
pub struct IncentiveService {
    store: Arc<dyn ClaimStore>,
}

impl IncentiveService {
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self { store }
    }

    /// Staff visible to `principal` for `event_id`, each with that event's
    /// assignments.
    #[tracing::instrument(skip(self, principal), fields(user_id = %principal.user_id, role = %principal.role))]
    pub async fn users_with_assigned(
        &self,
        principal: &Principal,
        event_id: i64,
    ) -> Result<Vec<UserWithAssignedIncentives>, ClaimError> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or(ClaimError::EventNotFound)?;

        let filter = resolve_visibility_filter(principal, &event);
        let users = self
            .store
            .list_users_with_assigned_incentives(event.event_id, &filter)
            .await?;

        tracing::debug!(count = users.len(), "Resolved visible staff");
        Ok(users)
    }
}
