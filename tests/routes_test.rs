// ABOUTME: HTTP-level integration tests for the REST API
// ABOUTME: Drives register, onboarding, entry logging, dashboard, leaderboard, and chat
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wedfit_server::routes;

async fn test_app() -> Router {
    let resources = common::create_test_resources().await.unwrap();
    routes::router(resources)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return their bearer token
async fn register(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": email, "password": "longenough" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    body["token"].as_str().unwrap().to_owned()
}

/// Complete onboarding with the standard test goal
async fn onboard(app: &Router, token: &str, username: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/profile/onboarding",
            Some(token),
            json!({
                "username": username,
                "initial_weight": 200.0,
                "target_weight": 180.0,
                "target_miles": 4.0,
                "target_streak": 14
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "wedfit-server");
}

#[tokio::test]
async fn test_register_validates_and_rejects_duplicates() {
    let app = test_app().await;

    // Password too short
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "angela@example.com", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    register(&app, "angela@example.com").await;

    // Same email again conflicts
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "angela@example.com", "password": "longenough" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = test_app().await;
    register(&app, "angela@example.com").await;

    // Wrong password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "angela@example.com", "password": "wrongwrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "angela@example.com", "password": "longenough" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["onboarded"], false);
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let app = test_app().await;

    for uri in ["/api/dashboard", "/api/profile", "/api/leaderboard", "/api/chat"] {
        let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_onboarding_flow_and_dashboard() {
    let app = test_app().await;
    let token = register(&app, "angela@example.com").await;
    onboard(&app, &token, "angela").await;

    // Onboarding twice is rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/profile/onboarding",
            Some(&token),
            json!({
                "username": "angela",
                "initial_weight": 200.0,
                "target_weight": 180.0,
                "target_miles": 4.0,
                "target_streak": 14
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Log a weight halfway to the target; the response carries the new percent
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/entries/weight",
            Some(&token),
            json!({ "weight": 190.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["percent"], 50.0);

    // Log a run at half the target distance
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/entries/runs",
            Some(&token),
            json!({ "distance": 2.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["percent"], 50.0);

    let response = app
        .clone()
        .oneshot(get_request("/api/dashboard", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["username"], "angela");
    assert_eq!(body["onboarded"], true);
    assert_eq!(body["weight_percent"], 50.0);
    assert_eq!(body["miles_percent"], 50.0);
    // An entry logged today never counts toward the streak
    assert_eq!(body["current_streak"], 0);
    assert!(body["days_until_event"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_entry_validation() {
    let app = test_app().await;
    let token = register(&app, "angela@example.com").await;

    for (uri, body) in [
        ("/api/entries/weight", json!({ "weight": 0.0 })),
        ("/api/entries/weight", json!({ "weight": -10.0 })),
        ("/api/entries/runs", json!({ "distance": -1.0 })),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", uri, Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_leaderboard_lists_onboarded_users() {
    let app = test_app().await;

    let angela = register(&app, "angela@example.com").await;
    onboard(&app, &angela, "angela").await;

    // A registered but not onboarded user stays off the board
    let pending = register(&app, "pending@example.com").await;

    let response = app
        .clone()
        .oneshot(get_request("/api/leaderboard", Some(&pending)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let weight = body["weight"].as_array().unwrap();
    assert_eq!(weight.len(), 1);
    assert_eq!(weight[0]["username"], "angela");
    assert_eq!(weight[0]["rank"], 1);
    assert!(body["kudos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_post_and_list() {
    let app = test_app().await;
    let token = register(&app, "angela@example.com").await;
    onboard(&app, &token, "angela").await;

    // Empty messages are rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            Some(&token),
            json!({ "message": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            Some(&token),
            json!({ "message": "28 days to go!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    // The author's name is snapshotted into the message
    assert_eq!(body["username"], "angela");

    let response = app
        .clone()
        .oneshot(get_request("/api/chat?limit=10", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["messages"][0]["message"], "28 days to go!");
}

#[tokio::test]
async fn test_logout_returns_no_content() {
    let app = test_app().await;
    let token = register(&app, "angela@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", Some(&token), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_profile_update_round_trip() {
    let app = test_app().await;
    let token = register(&app, "angela@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile",
            Some(&token),
            json!({ "username": "angela", "target_miles": 6.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/profile", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["username"], "angela");
    assert_eq!(body["target_miles"], 6.0);
    assert_eq!(body["onboarded"], false);
}
