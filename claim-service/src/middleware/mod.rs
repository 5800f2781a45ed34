pub mod claim_session;
pub mod principal;

pub use claim_session::{claim_session_middleware, AuthorizedClaim};
pub use principal::{principal_middleware, AdminPrincipal};
