use service_core::error::AppError;
use thiserror::Error;

/// Failures of the claim and admin flows.
///
/// Every variant except `Database` and `Internal` is a client-facing outcome.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Invalid verification, please provide OTP or Birthday")]
    MissingCredential,

    #[error("Member not found")]
    MemberNotFound,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Invalid Birthday")]
    InvalidBirthday,

    #[error("You don't have a birthday in our record. Use OTP instead.")]
    NoBirthdayOnRecord,

    #[error("Event wasn't found or does not exist")]
    EventNotFound,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClaimError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimError::MissingCredential => "missing_credential",
            ClaimError::MemberNotFound => "member_not_found",
            ClaimError::InvalidCode => "invalid_code",
            ClaimError::InvalidBirthday => "invalid_birthday",
            ClaimError::NoBirthdayOnRecord => "no_birthday_on_record",
            ClaimError::EventNotFound => "event_not_found",
            ClaimError::ValidationError(_) => "validation_error",
            ClaimError::Database(_) => "database",
            ClaimError::Internal(_) => "internal",
        }
    }
}

impl From<ClaimError> for AppError {
    fn from(err: ClaimError) -> Self {
        let message = anyhow::anyhow!(err.to_string());
        match err {
            ClaimError::MissingCredential => AppError::Forbidden(message),
            ClaimError::MemberNotFound | ClaimError::EventNotFound => AppError::NotFound(message),
            ClaimError::InvalidCode
            | ClaimError::InvalidBirthday
            | ClaimError::NoBirthdayOnRecord
            | ClaimError::ValidationError(_) => AppError::BadRequest(message),
            ClaimError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ClaimError::Internal(e) => AppError::InternalError(e),
        }
    }
}
