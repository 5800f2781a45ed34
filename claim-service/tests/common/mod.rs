//! Shared setup for claim-service integration tests.
//!
//! Builds the full router over an in-memory store seeded with one event and
//! its attendees, so no database is required.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use claim_service::{
    build_router,
    config::{
        ClaimConfig, ClaimSessionConfig, DatabaseConfig, Environment, PrincipalConfig,
        RateLimitConfig, SecurityConfig, SwaggerConfig, SwaggerMode,
    },
    models::{Attendee, Event, Principal},
    services::{InMemoryStore, PrincipalVerifier},
    AppState,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const EVENT_ID: i64 = 7;
pub const OTHER_EVENT_ID: i64 = 8;
pub const PASSBOOK: &str = "PB-001";
pub const CODE: &str = "482913";
pub const NO_BIRTHDAY_PASSBOOK: &str = "PB-002";
pub const ORG: i64 = 1;
pub const BRANCH: i64 = 10;

const CLAIM_SECRET: &str = "claim-test-secret-claim-test-secret";
const PRINCIPAL_SECRET: &str = "principal-test-secret-principal-test";

pub fn test_config() -> ClaimConfig {
    ClaimConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "claim-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        claim: ClaimSessionConfig {
            token_secret: Secret::new(CLAIM_SECRET.to_string()),
            token_max_age_minutes: 15,
            timezone_offset_minutes: 120,
            secure_cookies: true,
        },
        principal: PrincipalConfig {
            token_secret: Secret::new(PRINCIPAL_SECRET.to_string()),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
        rate_limit: RateLimitConfig {
            global_ip_limit: 1000,
            global_ip_window_seconds: 60,
            trust_forwarded: false,
        },
    }
}

pub fn event(event_id: i64, organization_id: i64, branch_id: i64) -> Event {
    Event {
        event_id,
        organization_id,
        branch_id,
        title: format!("General Assembly {}", event_id),
        event_date: Utc::now(),
        location: "Main Hall".to_string(),
        require_birthday_verification: false,
        deleted: false,
    }
}

pub fn attendee(event_id: i64, passbook: &str, code: &str, birthday: Option<NaiveDate>) -> Attendee {
    Attendee {
        attendee_id: Uuid::new_v4(),
        event_id,
        passbook_number: passbook.to_string(),
        first_name: "Maria".to_string(),
        middle_name: Some("Cruz".to_string()),
        last_name: "Santos".to_string(),
        contact: Some("09171234567".to_string()),
        picture: None,
        birthday,
        vote_otp: code.to_string(),
        registered: true,
        surveyed: false,
        voted: false,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
    pub attendee_id: Uuid,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: ClaimConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());

        store.insert_event(event(EVENT_ID, ORG, BRANCH));
        store.insert_event(event(OTHER_EVENT_ID, ORG, BRANCH));

        let member = attendee(EVENT_ID, PASSBOOK, CODE, NaiveDate::from_ymd_opt(1990, 5, 15));
        let attendee_id = member.attendee_id;
        store.insert_attendee(member);
        store.insert_attendee(attendee(EVENT_ID, NO_BIRTHDAY_PASSBOOK, "771204", None));
        store.insert_attendee(attendee(OTHER_EVENT_ID, PASSBOOK, "555555", None));

        let state =
            AppState::new(config, store.clone(), None).expect("Failed to build app state");
        let router = build_router(state.clone())
            .await
            .expect("Failed to build router");

        Self {
            router,
            store,
            state,
            attendee_id,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    pub async fn authorize(&self, event_id: i64, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/v1/public/event/{}/claim/authorize-claim",
                    event_id
                ))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub fn principal_token(&self, principal: &Principal) -> String {
        PrincipalVerifier::new(&Secret::new(PRINCIPAL_SECRET.to_string()))
            .issue(principal, Duration::minutes(5))
            .expect("Failed to issue principal token")
    }
}

/// `name=value` pairs of every `Set-Cookie` header.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Value of cookie `name` among the `Set-Cookie` headers.
pub fn cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(response).into_iter().find_map(|c| {
        let pair = c.split(';').next()?;
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
