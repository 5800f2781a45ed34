use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

use crate::{
    dtos::claim::AuthorizeClaimRequest,
    handlers::cookies::{
        clear_authorization, issue_authorization, remember_recent_user, RECENT_USER_COOKIE,
    },
    middleware::AuthorizedClaim,
    models::{MemberMinimalInfo, MemberProfile},
    utils::{EventId, ValidatedJson},
    AppState,
};

/// Verify a member by one-time code or birthday and open a claim session
#[utoipa::path(
    post,
    path = "/api/v1/public/event/{id}/claim/authorize-claim",
    params(("id" = i64, Path, description = "Event id")),
    request_body = AuthorizeClaimRequest,
    responses(
        (status = 200, description = "Member verified; auth-token and recent-user cookies set", body = MemberProfile),
        (status = 400, description = "Invalid code, birthday or event id", body = ErrorResponse),
        (status = 403, description = "Neither otp nor birthday supplied", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Claim"
)]
pub async fn authorize_claim(
    State(state): State<AppState>,
    EventId(event_id): EventId,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<AuthorizeClaimRequest>,
) -> Result<(CookieJar, Json<MemberProfile>), AppError> {
    let (passbook_number, credential) = req.into_parts();
    let auth = state
        .claims
        .authorize(event_id, &passbook_number, credential)
        .await?;

    let secure = state.config.claim.secure_cookies;
    let jar = issue_authorization(jar, &state.sessions, &auth.grant, secure)?;
    let jar = remember_recent_user(jar, &auth.member.passbook_number, secure);

    Ok((jar, Json(auth.member)))
}

/// Profile of the member holding the current claim session
#[utoipa::path(
    get,
    path = "/api/v1/public/event/{id}/claim/me",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Authorized member", body = MemberProfile),
        (status = 401, description = "Missing, invalid or foreign claim session", body = ErrorResponse),
        (status = 404, description = "Member no longer exists", body = ErrorResponse)
    ),
    tag = "Claim"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthorizedClaim(session): AuthorizedClaim,
) -> Result<Json<MemberProfile>, AppError> {
    let member = state.claims.member(&session).await?;
    Ok(Json(member))
}

/// Member last verified on this device, for pre-filling the lookup
#[utoipa::path(
    get,
    path = "/api/v1/public/event/{id}/claim/recent-user",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Recently verified member", body = MemberMinimalInfo),
        (status = 400, description = "Invalid event id", body = ErrorResponse),
        (status = 404, description = "No recent member for this event", body = ErrorResponse)
    ),
    tag = "Claim"
)]
pub async fn recent_user(
    State(state): State<AppState>,
    EventId(event_id): EventId,
    jar: CookieJar,
) -> Result<Json<MemberMinimalInfo>, AppError> {
    let passbook_number = jar
        .get(RECENT_USER_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No recent member")))?;

    let member = state
        .claims
        .recent_member(event_id, &passbook_number)
        .await?;
    Ok(Json(member))
}

/// Close the claim session
#[utoipa::path(
    delete,
    path = "/api/v1/public/event/{id}/claim/authorize-claim",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "auth-token cookie cleared"),
        (status = 400, description = "Invalid event id", body = ErrorResponse)
    ),
    tag = "Claim"
)]
pub async fn sign_out(EventId(event_id): EventId, jar: CookieJar) -> (CookieJar, StatusCode) {
    (clear_authorization(jar, event_id), StatusCode::NO_CONTENT)
}
