// ABOUTME: Integration tests for authentication and session-state tracking
// ABOUTME: Validates token lifecycle, password hashing, and session transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use wedfit_server::auth::{
    hash_password, verify_password, JwtValidationError, SessionHub, SessionState,
};
use wedfit_server::models::User;

fn create_test_user() -> User {
    User::new("test@example.com".into(), "hashed_password_123".into())
}

#[test]
fn test_generate_and_validate_token() {
    let auth_manager = common::create_test_auth_manager();
    let user = create_test_user();

    let token = auth_manager.generate_token(&user).unwrap();
    assert!(!token.is_empty());

    let claims = auth_manager.validate_token(&token).unwrap();
    assert_eq!(claims.email, "test@example.com");
    assert_eq!(claims.sub, user.id.to_string());
    assert!(claims.exp > Utc::now().timestamp());
}

#[test]
fn test_token_rejected_across_managers() {
    let manager_a = common::create_test_auth_manager();
    let manager_b = common::create_test_auth_manager();
    let token = manager_a.generate_token(&create_test_user()).unwrap();

    match manager_b.validate_token(&token) {
        Err(JwtValidationError::TokenInvalid { .. }) => {}
        other => panic!("expected TokenInvalid, got {other:?}"),
    }
}

#[test]
fn test_garbage_token_is_malformed() {
    let auth_manager = common::create_test_auth_manager();

    match auth_manager.validate_token("not-a-jwt") {
        Err(JwtValidationError::TokenMalformed { .. }) => {}
        other => panic!("expected TokenMalformed, got {other:?}"),
    }
}

#[test]
fn test_authenticate_bearer_header() {
    let auth_manager = common::create_test_auth_manager();
    let user = create_test_user();
    let token = auth_manager.generate_token(&user).unwrap();

    let result = auth_manager
        .authenticate(&format!("Bearer {token}"))
        .unwrap();
    assert_eq!(result.user_id, user.id);
    assert_eq!(result.email, user.email);

    // Raw token without the scheme is rejected
    assert!(auth_manager.authenticate(&token).is_err());
}

#[test]
fn test_tokens_unique_across_rapid_calls() {
    let auth_manager = common::create_test_auth_manager();
    let user = create_test_user();

    let first = auth_manager.generate_token(&user).unwrap();
    let second = auth_manager.generate_token(&user).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password("hunter2hunter2").unwrap();
    assert_ne!(hash, "hunter2hunter2");
    assert!(verify_password("hunter2hunter2", &hash).unwrap());
    assert!(!verify_password("wrong", &hash).unwrap());
}

#[tokio::test]
async fn test_session_transitions_in_order() {
    let hub = SessionHub::new();
    let mut rx = hub.subscribe();
    let user = create_test_user();

    hub.publish(user.id, SessionState::PendingOnboarding);
    hub.publish(user.id, SessionState::Onboarded);
    hub.publish(user.id, SessionState::SignedOut);

    assert_eq!(rx.recv().await.unwrap().state, SessionState::PendingOnboarding);
    assert_eq!(rx.recv().await.unwrap().state, SessionState::Onboarded);
    assert_eq!(rx.recv().await.unwrap().state, SessionState::SignedOut);
}

#[tokio::test]
async fn test_dropped_receiver_unsubscribes() {
    let hub = SessionHub::new();
    let rx = hub.subscribe();
    drop(rx);

    // Publishing after the only subscriber is gone must not fail
    hub.publish(create_test_user().id, SessionState::SignedOut);

    // A fresh subscriber only sees transitions published after it joined
    let mut rx = hub.subscribe();
    hub.publish(create_test_user().id, SessionState::PendingOnboarding);
    assert_eq!(
        rx.recv().await.unwrap().state,
        SessionState::PendingOnboarding
    );
}
