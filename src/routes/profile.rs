// ABOUTME: Profile route handlers for viewing, editing, onboarding, and avatar upload
// ABOUTME: Provides REST endpoints for the one-time onboarding step and profile maintenance
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! Profile and onboarding routes.
//!
//! Onboarding is the one-time profile-completion step gating the main app:
//! it records the display name, the baseline weight, and the goal targets,
//! then flips the `onboarded` flag. Avatar upload is best-effort; a failed
//! upload never touches the stored profile.

use crate::auth::SessionState;
use crate::constants::limits::AVATAR_MAX_BYTES;
use crate::database::FitnessStore;
use crate::errors::AppError;
use crate::models::{Goal, UserProfile};
use crate::resources::ServerResources;
use crate::routes::authenticate;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response describing the caller's profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User ID
    pub user_id: String,
    /// Display name
    pub username: Option<String>,
    /// Profile picture URL
    pub profile_picture: Option<String>,
    /// Baseline weight recorded at onboarding
    pub initial_weight: Option<f64>,
    /// Target weight
    pub target_weight: Option<f64>,
    /// Target single-run miles
    pub target_miles: Option<f64>,
    /// Target eating-well streak in days
    pub target_streak: Option<i64>,
    /// Whether onboarding has been completed
    pub onboarded: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            username: profile.username,
            profile_picture: profile.profile_picture,
            initial_weight: profile.initial_weight,
            target_weight: profile.goal.target_weight,
            target_miles: profile.goal.target_miles,
            target_streak: profile.goal.target_streak,
            onboarded: profile.onboarded,
        }
    }
}

/// Request to edit profile fields; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name
    pub username: Option<String>,
    /// New baseline weight
    pub initial_weight: Option<f64>,
    /// New target weight
    pub target_weight: Option<f64>,
    /// New target single-run miles
    pub target_miles: Option<f64>,
    /// New target streak in days
    pub target_streak: Option<i64>,
}

/// Request to complete the one-time onboarding step
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    /// Display name
    pub username: String,
    /// Baseline weight
    pub initial_weight: f64,
    /// Target weight
    pub target_weight: f64,
    /// Target single-run miles
    pub target_miles: f64,
    /// Target streak in days
    pub target_streak: i64,
}

/// Response after an avatar upload
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    /// Public URL the avatar is served under
    pub profile_picture: String,
}

// ============================================================================
// Routes
// ============================================================================

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::handle_get_profile))
            .route("/api/profile", put(Self::handle_update_profile))
            .route("/api/profile/onboarding", post(Self::handle_onboarding))
            .route("/api/profile/avatar", post(Self::handle_upload_avatar))
            .with_state(resources)
    }

    fn validate_positive(value: f64, field: &str) -> Result<(), AppError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(
                AppError::invalid_input(format!("{field} must be a positive number"))
                    .with_details(serde_json::json!({ "field": field })),
            );
        }
        Ok(())
    }

    /// Handle GET /api/profile - Fetch the caller's profile
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let profile = resources
            .database
            .get_profile(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile").with_user_id(auth.user_id))?;

        Ok((StatusCode::OK, Json(ProfileResponse::from(profile))).into_response())
    }

    /// Handle PUT /api/profile - Edit profile fields
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        if let Some(weight) = body.initial_weight {
            Self::validate_positive(weight, "initial_weight")?;
        }
        if let Some(weight) = body.target_weight {
            Self::validate_positive(weight, "target_weight")?;
        }
        if let Some(miles) = body.target_miles {
            Self::validate_positive(miles, "target_miles")?;
        }
        if let Some(streak) = body.target_streak {
            if streak < 1 {
                return Err(AppError::invalid_input("target_streak must be at least 1"));
            }
        }

        let mut profile = resources
            .database
            .get_profile(auth.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(auth.user_id));

        if let Some(username) = body.username {
            if username.trim().is_empty() {
                return Err(AppError::invalid_input("username must not be empty"));
            }
            profile.username = Some(username);
        }
        if body.initial_weight.is_some() {
            profile.initial_weight = body.initial_weight;
        }
        if body.target_weight.is_some() {
            profile.goal.target_weight = body.target_weight;
        }
        if body.target_miles.is_some() {
            profile.goal.target_miles = body.target_miles;
        }
        if body.target_streak.is_some() {
            profile.goal.target_streak = body.target_streak;
        }

        resources.database.update_profile(&profile).await?;

        Ok((StatusCode::OK, Json(ProfileResponse::from(profile))).into_response())
    }

    /// Handle POST /api/profile/onboarding - Complete the one-time setup
    async fn handle_onboarding(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<OnboardingRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        if body.username.trim().is_empty() {
            return Err(AppError::invalid_input("username must not be empty"));
        }
        Self::validate_positive(body.initial_weight, "initial_weight")?;
        Self::validate_positive(body.target_weight, "target_weight")?;
        Self::validate_positive(body.target_miles, "target_miles")?;
        if body.target_streak < 1 {
            return Err(AppError::invalid_input("target_streak must be at least 1"));
        }

        let mut profile = resources
            .database
            .get_profile(auth.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(auth.user_id));

        if profile.onboarded {
            return Err(AppError::invalid_input("Onboarding is already completed"));
        }

        profile.username = Some(body.username);
        profile.initial_weight = Some(body.initial_weight);
        profile.goal = Goal {
            target_weight: Some(body.target_weight),
            target_miles: Some(body.target_miles),
            target_streak: Some(body.target_streak),
        };
        profile.onboarded = true;

        resources.database.update_profile(&profile).await?;
        resources
            .session_hub
            .publish(auth.user_id, SessionState::Onboarded);

        info!("User {} completed onboarding", auth.user_id);

        Ok((StatusCode::OK, Json(ProfileResponse::from(profile))).into_response())
    }

    /// Handle POST /api/profile/avatar - Upload a profile picture
    async fn handle_upload_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let Some(storage) = resources.avatar_storage.as_ref() else {
            return Err(AppError::new(
                crate::errors::ErrorCode::ResourceUnavailable,
                "Avatar storage is not configured",
            ));
        };

        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Invalid multipart body: {e}")))?
            .ok_or_else(|| AppError::invalid_input("Missing avatar file"))?;

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_input(format!("Failed to read avatar: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::invalid_input("Avatar file is empty"));
        }
        if bytes.len() > AVATAR_MAX_BYTES {
            return Err(AppError::invalid_input(format!(
                "Avatar exceeds the {AVATAR_MAX_BYTES} byte limit"
            )));
        }

        let url = match storage
            .put_avatar(auth.user_id, bytes.to_vec(), &content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                // Best-effort: the profile keeps its previous picture
                warn!(user_id = %auth.user_id, "Avatar upload failed: {e}");
                return Err(AppError::external_service("avatar storage", e.to_string()));
            }
        };

        let mut profile = resources
            .database
            .get_profile(auth.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(auth.user_id));
        profile.profile_picture = Some(url.clone());
        resources.database.update_profile(&profile).await?;

        Ok((StatusCode::OK, Json(AvatarResponse { profile_picture: url })).into_response())
    }
}
