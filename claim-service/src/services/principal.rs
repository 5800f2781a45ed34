//! Admin principal resolution from bearer tokens.
//!
//! The identity provider that signs these tokens lives outside this service;
//! only the shared HS256 key is configured here.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Principal, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalClaims {
    /// Subject (staff user ID)
    pub sub: Uuid,
    pub role: String,
    pub organization_id: i64,
    pub branch_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Clone)]
pub struct PrincipalVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl PrincipalVerifier {
    pub fn new(secret: &Secret<String>) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
        }
    }

    /// Tokens naming a role outside the closed set are rejected.
    pub fn verify(&self, token: &str) -> Result<Principal, anyhow::Error> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<PrincipalClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid principal token: {}", e))?
            .claims;

        let role: Role = claims
            .role
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        Ok(Principal {
            user_id: claims.sub,
            role,
            organization_id: claims.organization_id,
            branch_id: claims.branch_id,
        })
    }

    /// Mint a token for `principal`. Used by tooling and tests.
    pub fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String, anyhow::Error> {
        let claims = PrincipalClaims {
            sub: principal.user_id,
            role: principal.role.as_str().to_string(),
            organization_id: principal.organization_id,
            branch_id: principal.branch_id,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode principal token: {}", e))
    }
}
