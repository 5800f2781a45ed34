//! Read access to events, attendees and staff assignments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ClaimError, VisibilityFilter};
use crate::models::{
    Attendee, Event, IncentiveAssignment, StaffUser, UserWithAssignedIncentives,
};

#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Non-deleted event by id.
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, ClaimError>;

    /// Exact-match lookup within one event.
    async fn find_attendee_by_passbook(
        &self,
        event_id: i64,
        passbook_number: &str,
    ) -> Result<Option<Attendee>, ClaimError>;

    async fn find_attendee_by_id(
        &self,
        event_id: i64,
        attendee_id: Uuid,
    ) -> Result<Option<Attendee>, ClaimError>;

    /// Staff rows passing `filter`, each with its assignments for `event_id`.
    async fn list_users_with_assigned_incentives(
        &self,
        event_id: i64,
        filter: &VisibilityFilter,
    ) -> Result<Vec<UserWithAssignedIncentives>, ClaimError>;

    async fn health_check(&self) -> Result<(), anyhow::Error>;
}

/// In-memory store for tests and local tooling.
#[derive(Default)]
pub struct InMemoryStore {
    events: RwLock<HashMap<i64, Event>>,
    attendees: RwLock<Vec<Attendee>>,
    users: RwLock<Vec<StaffUser>>,
    assignments: RwLock<Vec<IncentiveAssignment>>,
    attendee_lookups: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_event(&self, event: Event) {
        if let Ok(mut events) = self.events.write() {
            events.insert(event.event_id, event);
        }
    }

    pub fn insert_attendee(&self, attendee: Attendee) {
        if let Ok(mut attendees) = self.attendees.write() {
            attendees.push(attendee);
        }
    }

    pub fn insert_user(&self, user: StaffUser) {
        if let Ok(mut users) = self.users.write() {
            users.push(user);
        }
    }

    pub fn insert_assignment(&self, assignment: IncentiveAssignment) {
        if let Ok(mut assignments) = self.assignments.write() {
            assignments.push(assignment);
        }
    }

    /// Number of attendee lookups served so far.
    pub fn attendee_lookups(&self) -> usize {
        self.attendee_lookups.load(Ordering::SeqCst)
    }

    fn poisoned() -> ClaimError {
        ClaimError::Internal(anyhow::anyhow!("In-memory store lock poisoned"))
    }
}

#[async_trait]
impl ClaimStore for InMemoryStore {
    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, ClaimError> {
        let events = self.events.read().map_err(|_| Self::poisoned())?;
        Ok(events.get(&event_id).filter(|e| !e.deleted).cloned())
    }

    async fn find_attendee_by_passbook(
        &self,
        event_id: i64,
        passbook_number: &str,
    ) -> Result<Option<Attendee>, ClaimError> {
        self.attendee_lookups.fetch_add(1, Ordering::SeqCst);
        let attendees = self.attendees.read().map_err(|_| Self::poisoned())?;
        Ok(attendees
            .iter()
            .find(|a| a.event_id == event_id && a.passbook_number == passbook_number)
            .cloned())
    }

    async fn find_attendee_by_id(
        &self,
        event_id: i64,
        attendee_id: Uuid,
    ) -> Result<Option<Attendee>, ClaimError> {
        self.attendee_lookups.fetch_add(1, Ordering::SeqCst);
        let attendees = self.attendees.read().map_err(|_| Self::poisoned())?;
        Ok(attendees
            .iter()
            .find(|a| a.event_id == event_id && a.attendee_id == attendee_id)
            .cloned())
    }

    async fn list_users_with_assigned_incentives(
        &self,
        event_id: i64,
        filter: &VisibilityFilter,
    ) -> Result<Vec<UserWithAssignedIncentives>, ClaimError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        let assignments = self.assignments.read().map_err(|_| Self::poisoned())?;

        let mut visible: Vec<&StaffUser> = users.iter().filter(|u| filter.matches(u)).collect();
        visible.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        Ok(visible
            .into_iter()
            .map(|user| {
                let assigned = assignments
                    .iter()
                    .filter(|a| a.event_id == event_id && a.user_id == user.user_id)
                    .cloned()
                    .collect();
                UserWithAssignedIncentives::new(user.clone(), assigned)
            })
            .collect())
    }

    async fn health_check(&self) -> Result<(), anyhow::Error> {
        Ok(())
    }
}
