pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use service_core::axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{ClaimConfig, SwaggerMode};
use crate::services::{
    ClaimService, ClaimSessionIssuer, ClaimStore, IncentiveService, PrincipalVerifier,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::event::get_event,
        handlers::claim::authorize_claim,
        handlers::claim::sign_out,
        handlers::claim::me,
        handlers::claim::recent_user,
        handlers::incentives::users_with_assigned,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::claim::AuthorizeClaimRequest,
            models::EventResponse,
            models::MemberProfile,
            models::MemberMinimalInfo,
            models::UserWithAssignedIncentives,
            models::IncentiveAssignment,
            models::Role,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Event", description = "Public event information"),
        (name = "Claim", description = "Member verification and claim sessions"),
        (name = "Admin", description = "Role-scoped staff views"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: ClaimConfig,
    pub store: Arc<dyn ClaimStore>,
    pub claims: ClaimService,
    pub incentives: IncentiveService,
    pub sessions: ClaimSessionIssuer,
    pub principals: PrincipalVerifier,
    pub ip_rate_limiter: IpRateLimiter,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the services over `store` according to `config`.
    pub fn new(
        config: ClaimConfig,
        store: Arc<dyn ClaimStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        let birthdays = services::BirthdayMatcher::new(config.claim.timezone_offset_minutes)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(Self {
            claims: ClaimService::new(store.clone(), birthdays),
            incentives: IncentiveService::new(store.clone()),
            sessions: ClaimSessionIssuer::from_config(&config.claim)
                .map_err(AppError::ConfigError)?,
            principals: PrincipalVerifier::new(&config.principal.token_secret),
            ip_rate_limiter: service_core::middleware::rate_limit::create_ip_rate_limiter(
                config.rate_limit.global_ip_limit,
                config.rate_limit.global_ip_window_seconds,
            )
            .trust_forwarded(config.rate_limit.trust_forwarded),
            store,
            metrics,
            config,
        })
    }
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    let claim_gated = Router::new()
        .route("/api/v1/public/event/:id/claim/me", get(handlers::me))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::claim_session_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/event/:id/incentives/user-with-assigned",
            get(handlers::users_with_assigned),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::principal_middleware,
        ));

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics));

    if state.config.swagger.enabled == SwaggerMode::Public {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { service_core::axum::Json(ApiDoc::openapi()) }),
        );
    }

    let ip_limiter = state.ip_rate_limiter.clone();
    let timeout = Duration::from_secs(state.config.common.request_timeout_seconds);
    let cors = cors_layer(&state.config.security.allowed_origins);

    let app = app
        .route("/api/v1/public/event/:id", get(handlers::get_event))
        .route(
            "/api/v1/public/event/:id/claim/authorize-claim",
            service_core::axum::routing::post(handlers::authorize_claim)
                .delete(handlers::sign_out),
        )
        .route(
            "/api/v1/public/event/:id/claim/recent-user",
            get(handlers::recent_user),
        )
        .merge(claim_gated)
        .merge(admin_routes)
        .with_state(state)
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(TimeoutLayer::new(timeout))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &service_core::axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                    user_id = tracing::field::Empty,
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

/// Credentialed CORS for the configured browser origins. Wildcards and
/// invalid entries are skipped rather than widened.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|o| {
            let wildcard = o.as_str() == "*";
            if wildcard {
                tracing::warn!("Wildcard CORS origin ignored for credentialed requests");
            }
            !wildcard
        })
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    service_core::axum::extract::State(state): service_core::axum::extract::State<AppState>,
) -> Result<service_core::axum::Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Store health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(service_core::axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": "up"
        }
    })))
}
