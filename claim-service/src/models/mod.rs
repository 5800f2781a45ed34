//! Domain models for claim-service.

mod attendee;
mod event;
mod incentive;
mod principal;
mod user;

pub use attendee::{Attendee, MemberMinimalInfo, MemberProfile};
pub use event::{Event, EventResponse};
pub use incentive::{IncentiveAssignment, UserWithAssignedIncentives};
pub use principal::Principal;
pub use user::{Role, StaffUser};
