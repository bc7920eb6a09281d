// ABOUTME: Route module organization for WedFit HTTP endpoints
// ABOUTME: Centralized route definitions organized by domain, plus shared auth extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Route modules for the WedFit server.
//!
//! Each domain module contains its request/response types and thin handlers
//! that delegate to the engines; route structs expose a `routes()` builder
//! and the top-level [`router`] merges them behind shared middleware.

use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::http::HeaderMap;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Authentication and session routes
pub mod auth;
/// Group chat routes
pub mod chat;
/// Dashboard and metric entry routes
pub mod dashboard;
/// Health check routes
pub mod health;
/// Leaderboard routes
pub mod leaderboard;
/// Profile and onboarding routes
pub mod profile;

/// Assemble the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(auth::AuthRoutes::routes(Arc::clone(&resources)))
        .merge(profile::ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(dashboard::DashboardRoutes::routes(Arc::clone(&resources)))
        .merge(leaderboard::LeaderboardRoutes::routes(Arc::clone(&resources)))
        .merge(chat::ChatRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Read a cookie value from request headers
fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get("cookie")?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

/// Extract and authenticate the user from the authorization header or the
/// `auth_token` cookie.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<AuthResult, AppError> {
    let auth_value =
        if let Some(auth_header) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
            auth_header.to_owned()
        } else if let Some(token) = get_cookie_value(headers, "auth_token") {
            format!("Bearer {token}")
        } else {
            return Err(AppError::auth_invalid(
                "Missing authorization header or cookie",
            ));
        };

    resources.auth_manager.authenticate(&auth_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", "theme=dark; auth_token=abc123; lang=en".parse().unwrap());

        assert_eq!(get_cookie_value(&headers, "auth_token").as_deref(), Some("abc123"));
        assert_eq!(get_cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }
}
