//! Claim session tokens carried in the `auth-token` cookie.
//!
//! A token is an HS256 JWT bound to one event and one attendee. It is
//! short-lived and not stored anywhere; verification is purely cryptographic.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ClaimSessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimTokenClaims {
    pub event_id: i64,
    pub attendee_id: Uuid,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub jti: String,
}

/// Verified grant: this attendee may claim at this event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimSession {
    pub event_id: i64,
    pub attendee_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct IssuedClaimToken {
    pub token: String,
    pub max_age: Duration,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Claim session token is invalid")]
    Invalid,

    #[error("Claim session token has expired")]
    Expired,

    #[error("Failed to sign claim session token: {0}")]
    Signing(String),
}

#[derive(Clone)]
pub struct ClaimSessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    max_age: Duration,
}

impl ClaimSessionIssuer {
    pub fn new(secret: &Secret<String>, max_age: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            max_age,
        }
    }

    pub fn from_config(config: &ClaimSessionConfig) -> Result<Self, anyhow::Error> {
        let max_age = Duration::try_minutes(config.token_max_age_minutes)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Claim token max age of {} minutes is out of range",
                    config.token_max_age_minutes
                )
            })?;

        Ok(Self::new(&config.token_secret, max_age))
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn issue(&self, event_id: i64, attendee_id: Uuid) -> Result<IssuedClaimToken, SessionError> {
        let now = Utc::now();
        let claims = ClaimTokenClaims {
            event_id,
            attendee_id,
            iat: now.timestamp(),
            exp: (now + self.max_age).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))?;

        Ok(IssuedClaimToken {
            token,
            max_age: self.max_age,
        })
    }

    /// Reject anything malformed, badly signed, expired, or older than the
    /// configured maximum age.
    pub fn verify(&self, token: &str) -> Result<ClaimSession, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<ClaimTokenClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            },
        )?;

        let claims = data.claims;
        let age = Utc::now().timestamp() - claims.iat;
        if age > self.max_age.num_seconds() {
            return Err(SessionError::Expired);
        }

        Ok(ClaimSession {
            event_id: claims.event_id,
            attendee_id: claims.attendee_id,
        })
    }
}
