//! HTTP handlers for claim-service.

pub mod claim;
pub mod cookies;
pub mod event;
pub mod incentives;
pub mod metrics;

pub use claim::*;
pub use event::*;
pub use incentives::*;
