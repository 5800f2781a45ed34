//! Claim verification engine.
//!
//! Confirms a claimant's identity by one-time code or birthday and returns a
//! plain grant. Turning the grant into cookies is left to the HTTP layer.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use super::{BirthdayMatcher, ClaimError, ClaimSession, ClaimStore};
use crate::models::{Attendee, MemberMinimalInfo, MemberProfile};

/// Exactly one way of proving identity.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Code(String),
    Birthdate(String),
}

impl Credential {
    /// Build from the optional wire fields. Only the empty string counts as
    /// absent; whitespace is a supplied value that fails verification. The
    /// code wins when both are present.
    pub fn from_parts(otp: Option<String>, birthday: Option<String>) -> Option<Self> {
        let otp = otp.filter(|s| !s.is_empty());
        let birthday = birthday.filter(|s| !s.is_empty());

        match (otp, birthday) {
            (Some(code), _) => Some(Credential::Code(code)),
            (None, Some(date)) => Some(Credential::Birthdate(date)),
            (None, None) => None,
        }
    }

    fn method(&self) -> &'static str {
        match self {
            Credential::Code(_) => "code",
            Credential::Birthdate(_) => "birthday",
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Code(_) => f.write_str("Code(<redacted>)"),
            Credential::Birthdate(_) => f.write_str("Birthdate(<redacted>)"),
        }
    }
}

/// Successful verification.
#[derive(Debug, Clone)]
pub struct ClaimAuthorization {
    pub member: MemberProfile,
    pub grant: ClaimSession,
}

#[derive(Clone)]
pub struct ClaimService {
    store: Arc<dyn ClaimStore>,
    birthdays: BirthdayMatcher,
}

impl ClaimService {
    pub fn new(store: Arc<dyn ClaimStore>, birthdays: BirthdayMatcher) -> Self {
        Self { store, birthdays }
    }

    /// Verify `credential` for the attendee holding `passbook_number` at
    /// `event_id`. Read-only; repeating a successful call yields an
    /// equivalent grant.
    #[tracing::instrument(skip(self, credential), fields(method))]
    pub async fn authorize(
        &self,
        event_id: i64,
        passbook_number: &str,
        credential: Option<Credential>,
    ) -> Result<ClaimAuthorization, ClaimError> {
        let outcome = self.verify(event_id, passbook_number, credential).await;

        let label = match &outcome {
            Ok(_) => "authorized",
            Err(e) => e.kind(),
        };
        metrics::counter!("claim_authorizations_total", "outcome" => label).increment(1);

        match &outcome {
            Ok(auth) => tracing::info!(attendee_id = %auth.grant.attendee_id, "Claim authorized"),
            Err(ClaimError::Database(_) | ClaimError::Internal(_)) => {}
            Err(e) => tracing::info!(reason = e.kind(), "Claim authorization rejected"),
        }

        outcome
    }

    async fn verify(
        &self,
        event_id: i64,
        passbook_number: &str,
        credential: Option<Credential>,
    ) -> Result<ClaimAuthorization, ClaimError> {
        let credential = credential.ok_or(ClaimError::MissingCredential)?;
        tracing::Span::current().record("method", credential.method());

        let attendee = self
            .store
            .find_attendee_by_passbook(event_id, passbook_number)
            .await?
            .ok_or(ClaimError::MemberNotFound)?;

        match &credential {
            Credential::Code(code) => {
                let matches: bool = code.as_bytes().ct_eq(attendee.vote_otp.as_bytes()).into();
                if !matches {
                    return Err(ClaimError::InvalidCode);
                }
            }
            Credential::Birthdate(input) => {
                let stored = attendee.birthday.ok_or(ClaimError::NoBirthdayOnRecord)?;
                if !self.birthdays.matches(stored, input)? {
                    return Err(ClaimError::InvalidBirthday);
                }
            }
        }

        Ok(authorization(attendee))
    }

    /// Profile of an attendee already holding a claim session.
    pub async fn member(&self, session: &ClaimSession) -> Result<MemberProfile, ClaimError> {
        self.store
            .find_attendee_by_id(session.event_id, session.attendee_id)
            .await?
            .map(MemberProfile::from)
            .ok_or(ClaimError::MemberNotFound)
    }

    /// Identity card for the last passbook that authorized on this device.
    pub async fn recent_member(
        &self,
        event_id: i64,
        passbook_number: &str,
    ) -> Result<MemberMinimalInfo, ClaimError> {
        self.store
            .find_attendee_by_passbook(event_id, passbook_number)
            .await?
            .map(MemberMinimalInfo::from)
            .ok_or(ClaimError::MemberNotFound)
    }
}

fn authorization(attendee: Attendee) -> ClaimAuthorization {
    let grant = ClaimSession {
        event_id: attendee.event_id,
        attendee_id: attendee.attendee_id,
    };

    ClaimAuthorization {
        member: MemberProfile::from(attendee),
        grant,
    }
}
