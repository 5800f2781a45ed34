use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

use crate::{
    handlers::cookies::AUTH_TOKEN_COOKIE, services::ClaimSession, utils::EventId, AppState,
};

/// Gate for claim routes: requires an `auth-token` cookie issued for the
/// event named in the path.
pub async fn claim_session_middleware(
    State(state): State<AppState>,
    EventId(event_id): EventId,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(AUTH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Claim session required")))?;

    let session = state.sessions.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected claim session");
        AppError::Unauthorized(anyhow::anyhow!("Claim session is invalid or expired"))
    })?;

    if session.event_id != event_id {
        tracing::warn!(
            token_event = session.event_id,
            route_event = event_id,
            "Claim session used for another event"
        );
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Claim session is not valid for this event"
        )));
    }

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// Extractor for the session verified by `claim_session_middleware`.
pub struct AuthorizedClaim(pub ClaimSession);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthorizedClaim
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimSession>()
            .copied()
            .map(AuthorizedClaim)
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Claim session required")))
    }
}
