// ABOUTME: User authentication route handlers for registration, login, and logout
// ABOUTME: Provides REST endpoints for account creation and session tokens
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! Authentication routes.
//!
//! Registration creates the account plus its not-yet-onboarded profile in
//! one operation; login and logout publish session-state transitions on the
//! hub so subscribers observe {signed-out, pending-onboarding, onboarded}.

use crate::constants::limits::MIN_PASSWORD_LENGTH;
use crate::errors::AppError;
use crate::models::{User, UserProfile};
use crate::resources::ServerResources;
use crate::routes::authenticate;
use crate::{auth, auth::SessionState, database::FitnessStore};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to register a new account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address, used for login
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Request to log in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Response carrying a fresh session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Authenticated user ID
    pub user_id: String,
    /// Authenticated user email
    pub email: String,
    /// Whether the user has completed onboarding
    pub onboarded: bool,
}

// ============================================================================
// Routes
// ============================================================================

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
        if !email.contains('@') || email.len() < 3 {
            return Err(AppError::invalid_input("Invalid email address"));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }

    /// Handle POST /api/auth/register - Create account and profile
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        Self::validate_credentials(&body.email, &body.password)?;

        if resources
            .database
            .get_user_by_email(&body.email)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists("An account with this email"));
        }

        let password_hash = auth::hash_password(&body.password)?;
        let user = User::new(body.email, password_hash);

        resources.database.create_user(&user).await?;
        // The profile rides along from signup with onboarded = false; the
        // onboarding flow completes it later
        resources
            .database
            .update_profile(&UserProfile::new(user.id))
            .await?;

        let token = resources.auth_manager.generate_token(&user)?;
        resources
            .session_hub
            .publish(user.id, SessionState::PendingOnboarding);

        info!("Registered new user {}", user.id);

        let response = SessionResponse {
            token,
            user_id: user.id.to_string(),
            email: user.email,
            onboarded: false,
        };

        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login - Exchange credentials for a token
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .get_user_by_email(&body.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        if !user.is_active {
            return Err(AppError::auth_invalid("Account is deactivated"));
        }

        if !auth::verify_password(&body.password, &user.password_hash)? {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        resources.database.update_last_active(user.id).await?;

        let onboarded = resources
            .database
            .get_profile(user.id)
            .await?
            .is_some_and(|profile| profile.onboarded);

        let token = resources.auth_manager.generate_token(&user)?;
        resources.session_hub.publish(
            user.id,
            if onboarded {
                SessionState::Onboarded
            } else {
                SessionState::PendingOnboarding
            },
        );

        let response = SessionResponse {
            token,
            user_id: user.id.to_string(),
            email: user.email,
            onboarded,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/auth/logout - End the session
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth_result = authenticate(&headers, &resources)?;

        resources
            .session_hub
            .publish(auth_result.user_id, SessionState::SignedOut);

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
