mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{
    body_json, cookie_value, set_cookies, TestApp, CODE, EVENT_ID, NO_BIRTHDAY_PASSBOOK,
    OTHER_EVENT_ID, PASSBOOK,
};
use serde_json::json;

#[tokio::test]
async fn test_correct_code_sets_cookies_and_hides_code() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(EVENT_ID, json!({ "passbookNumber": PASSBOOK, "otp": CODE }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    let auth = cookies
        .iter()
        .find(|c| c.starts_with("auth-token="))
        .expect("auth-token cookie missing");
    assert!(auth.contains("HttpOnly"));
    assert!(auth.contains("Secure"));
    assert!(auth.contains("SameSite=Lax"));
    assert!(auth.contains("Path=/api/v1/public/event/7/claim"));
    assert!(auth.contains("Max-Age=900"));

    assert_eq!(
        cookie_value(&response, "recent-user").as_deref(),
        Some(PASSBOOK)
    );
    let recent = cookies
        .iter()
        .find(|c| c.starts_with("recent-user="))
        .expect("recent-user cookie missing");
    assert!(!recent.contains("Max-Age"));
    assert!(!recent.contains("Expires"));

    let body = body_json(response).await;
    assert_eq!(body["passbookNumber"], PASSBOOK);
    assert_eq!(body["id"], app.attendee_id.to_string());
    assert!(body.get("voteOtp").is_none());
    assert!(!body.to_string().contains(CODE));
}

#[tokio::test]
async fn test_wrong_code_is_bad_request_without_cookies() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(EVENT_ID, json!({ "passbookNumber": PASSBOOK, "otp": "000000" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(body_json(response).await["error"], "Invalid OTP");
}

#[tokio::test]
async fn test_utc_birthday_matches_in_claim_timezone() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(
            EVENT_ID,
            json!({ "passbookNumber": PASSBOOK, "birthday": "1990-05-14T23:00:00Z" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_value(&response, "auth-token").is_some());
}

#[tokio::test]
async fn test_birthday_one_day_off_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(
            EVENT_ID,
            json!({ "passbookNumber": PASSBOOK, "birthday": "1990-05-16" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid Birthday");
}

#[tokio::test]
async fn test_no_birthday_on_record_suggests_code() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(
            EVENT_ID,
            json!({ "passbookNumber": NO_BIRTHDAY_PASSBOOK, "birthday": "1990-05-15" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "You don't have a birthday in our record. Use OTP instead."
    );
}

#[tokio::test]
async fn test_missing_credential_is_forbidden_and_skips_lookup() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(EVENT_ID, json!({ "passbookNumber": PASSBOOK, "otp": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(app.store.attendee_lookups(), 0);
}

#[tokio::test]
async fn test_unknown_member_is_not_found_without_cookies() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(EVENT_ID, json!({ "passbookNumber": "PB-404", "otp": CODE }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(body_json(response).await["error"], "Member not found");
}

#[tokio::test]
async fn test_invalid_event_id_and_body_shapes() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(0, json!({ "passbookNumber": PASSBOOK, "otp": CODE }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .authorize(EVENT_ID, json!({ "passbookNumber": "", "otp": CODE }))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.authorize(EVENT_ID, json!({ "otp": CODE })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_event_id_is_json_bad_request() {
    let app = TestApp::spawn().await;
    let body = json!({ "passbookNumber": PASSBOOK, "otp": CODE }).to_string();

    for id in ["abc", "99999999999999999999999", "-3"] {
        let response = app
            .send(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/public/event/{}/claim/authorize-claim", id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "id {}", id);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(set_cookies(&response).is_empty());
        assert_eq!(body_json(response).await["error"], "Invalid event id");
    }

    for uri in [
        "/api/v1/public/event/abc",
        "/api/v1/public/event/abc/claim/recent-user",
    ] {
        let response = app
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body_json(response).await["error"], "Invalid event id");
    }
    assert_eq!(app.store.attendee_lookups(), 0);
}

#[tokio::test]
async fn test_whitespace_birthday_counts_as_supplied() {
    let app = TestApp::spawn().await;

    let response = app
        .authorize(EVENT_ID, json!({ "passbookNumber": PASSBOOK, "birthday": "   " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&response).is_empty());

    let response = app
        .authorize(
            EVENT_ID,
            json!({ "passbookNumber": NO_BIRTHDAY_PASSBOOK, "birthday": "   " }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "You don't have a birthday in our record. Use OTP instead."
    );
    assert_eq!(app.store.attendee_lookups(), 2);
}

#[tokio::test]
async fn test_claim_session_gates_me() {
    let app = TestApp::spawn().await;
    let me = |cookie: Option<String>, event_id: i64| {
        let mut builder = Request::builder().uri(format!(
            "/api/v1/public/event/{}/claim/me",
            event_id
        ));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, format!("auth-token={}", cookie));
        }
        builder.body(Body::empty()).unwrap()
    };

    let response = app.send(me(None, EVENT_ID)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(me(Some("garbage".to_string()), EVENT_ID)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let authorized = app
        .authorize(EVENT_ID, json!({ "passbookNumber": PASSBOOK, "otp": CODE }))
        .await;
    let token = cookie_value(&authorized, "auth-token").unwrap();

    let response = app.send(me(Some(token.clone()), EVENT_ID)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], app.attendee_id.to_string());
    assert!(body.get("voteOtp").is_none());

    let response = app.send(me(Some(token), OTHER_EVENT_ID)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recent_user_reads_cookie() {
    let app = TestApp::spawn().await;
    let recent = |cookie: Option<&str>| {
        let mut builder = Request::builder().uri(format!(
            "/api/v1/public/event/{}/claim/recent-user",
            EVENT_ID
        ));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, format!("recent-user={}", cookie));
        }
        builder.body(Body::empty()).unwrap()
    };

    let response = app.send(recent(None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(recent(Some("PB-404"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(recent(Some(PASSBOOK))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["passbookNumber"], PASSBOOK);
    assert_eq!(body["firstName"], "Maria");
    assert!(body.get("birthday").is_none());
    assert!(body.get("voteOtp").is_none());
}

#[tokio::test]
async fn test_sign_out_expires_auth_token() {
    let app = TestApp::spawn().await;

    let response = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!(
                    "/api/v1/public/event/{}/claim/authorize-claim",
                    EVENT_ID
                ))
                .header(header::COOKIE, "auth-token=anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cleared = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("auth-token="))
        .expect("removal cookie missing");
    assert!(cleared.contains("Max-Age=0"));
    assert!(cleared.contains("Path=/api/v1/public/event/7/claim"));
}

#[tokio::test]
async fn test_public_event_summary() {
    let app = TestApp::spawn().await;

    let response = app
        .send(
            Request::builder()
                .uri(format!("/api/v1/public/event/{}", EVENT_ID))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], EVENT_ID);
    assert_eq!(body["requireBirthdayVerification"], false);

    let response = app
        .send(
            Request::builder()
                .uri("/api/v1/public/event/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
