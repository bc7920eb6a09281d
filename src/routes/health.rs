// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides a basic liveness endpoint for monitoring infrastructure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Health check routes

use crate::constants::service_names;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" when the service is up
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    pub fn routes() -> Router {
        Router::new().route("/api/health", get(Self::handle_health))
    }

    /// Handle GET /api/health
    async fn handle_health() -> Response {
        let response = HealthResponse {
            status: "ok".to_owned(),
            service: service_names::WEDFIT_SERVER.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        };

        (StatusCode::OK, Json(response)).into_response()
    }
}
