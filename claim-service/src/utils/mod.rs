pub mod path;
pub mod validation;

pub use path::EventId;
pub use validation::ValidatedJson;
