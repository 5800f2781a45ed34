use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::{models::Principal, AppState};

/// Resolve the acting staff member from `Authorization: Bearer <token>`.
///
/// Requests without a verifiable principal never reach the handler.
pub async fn principal_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
        })?;

    let principal = state.principals.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected principal token");
        AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
    })?;

    tracing::Span::current().record("user_id", tracing::field::display(principal.user_id));
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Extractor for the principal resolved by `principal_middleware`.
pub struct AdminPrincipal(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AdminPrincipal)
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Authentication required")))
    }
}
