//! Cookie adapter for claim grants.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service_core::error::AppError;

use crate::services::{ClaimSession, ClaimSessionIssuer};

pub const AUTH_TOKEN_COOKIE: &str = "auth-token";
pub const RECENT_USER_COOKIE: &str = "recent-user";

/// Every claim route of one event lives under this path.
pub fn claim_path(event_id: i64) -> String {
    format!("/api/v1/public/event/{}/claim", event_id)
}

/// Sign `grant` and attach it as the `auth-token` cookie.
pub fn issue_authorization(
    jar: CookieJar,
    issuer: &ClaimSessionIssuer,
    grant: &ClaimSession,
    secure: bool,
) -> Result<CookieJar, AppError> {
    let issued = issuer
        .issue(grant.event_id, grant.attendee_id)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

    Ok(jar.add(
        Cookie::build((AUTH_TOKEN_COOKIE, issued.token))
            .path(claim_path(grant.event_id))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(issued.max_age.num_seconds()))
            .build(),
    ))
}

/// Remember the passbook that last authorized on this device, for the
/// lifetime of the browser session.
pub fn remember_recent_user(jar: CookieJar, passbook_number: &str, secure: bool) -> CookieJar {
    jar.add(
        Cookie::build((RECENT_USER_COOKIE, passbook_number.to_string()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .build(),
    )
}

pub fn clear_authorization(jar: CookieJar, event_id: i64) -> CookieJar {
    jar.remove(Cookie::build(AUTH_TOKEN_COOKIE).path(claim_path(event_id)))
}
