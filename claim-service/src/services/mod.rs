//! Business logic and persistence for claim-service.

pub mod birthday;
pub mod claim;
pub mod database;
pub mod error;
pub mod incentives;
pub mod principal;
pub mod session;
pub mod store;
pub mod visibility;

pub use birthday::BirthdayMatcher;
pub use claim::{ClaimAuthorization, ClaimService, Credential};
pub use database::Database;
pub use error::ClaimError;
pub use incentives::IncentiveService;
pub use principal::PrincipalVerifier;
pub use session::{ClaimSession, ClaimSessionIssuer, IssuedClaimToken, SessionError};
pub use store::{ClaimStore, InMemoryStore};
pub use visibility::{resolve_visibility_filter, VisibilityFilter};
