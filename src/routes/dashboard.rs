// ABOUTME: Dashboard route handlers for progress summary and metric entry logging
// ABOUTME: Provides REST endpoints for logging weight, runs, and eating-well days
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! Dashboard routes.
//!
//! The dashboard summary is the three progress percentages, the current
//! streak, and the countdown to the wedding. Entry submissions return the
//! freshly recomputed percentage for their metric so the UI can update the
//! bar without a second round trip.

use crate::database::FitnessStore;
use crate::errors::AppError;
use crate::models::{EatingWellEntry, RunEntry, WeightEntry};
use crate::progress::ProgressEngine;
use crate::resources::ServerResources;
use crate::routes::authenticate;
use crate::utils::days_until;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for the dashboard summary
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Display name, when the profile has one
    pub username: Option<String>,
    /// Whether onboarding has been completed
    pub onboarded: bool,
    /// Weight goal progress, 0-100
    pub weight_percent: f64,
    /// Running goal progress, 0-100
    pub miles_percent: f64,
    /// Streak goal progress, 0-100
    pub streak_percent: f64,
    /// Consecutive eating-well days ending yesterday
    pub current_streak: u32,
    /// Whole days until the wedding
    pub days_until_event: i64,
}

/// Request to log a weight measurement
#[derive(Debug, Deserialize)]
pub struct AddWeightRequest {
    /// Measured weight
    pub weight: f64,
    /// When the measurement was taken; defaults to now
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Request to log a run
#[derive(Debug, Deserialize)]
pub struct AddRunRequest {
    /// Distance covered, in miles
    pub distance: f64,
    /// When the run happened; defaults to now
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Request to log an eating-well day
#[derive(Debug, Default, Deserialize)]
pub struct AddEatingWellRequest {
    /// The day being logged; defaults to now
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Response after logging an entry: the metric's recomputed progress
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryAddedResponse {
    /// Progress for the affected metric after the new entry, 0-100
    pub percent: f64,
}

/// Response listing a user's entries for one metric
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse<T> {
    /// Entries, newest first
    pub entries: Vec<T>,
    /// Total count
    pub total: usize,
}

// ============================================================================
// Routes
// ============================================================================

/// Dashboard routes handler
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/dashboard", get(Self::handle_dashboard))
            .route("/api/entries/weight", post(Self::handle_add_weight))
            .route("/api/entries/weight", get(Self::handle_weight_history))
            .route("/api/entries/runs", post(Self::handle_add_run))
            .route("/api/entries/runs", get(Self::handle_run_history))
            .route("/api/entries/eating-well", post(Self::handle_add_eating_well))
            .route(
                "/api/entries/eating-well",
                get(Self::handle_eating_well_history),
            )
            .with_state(resources)
    }

    fn progress_engine(
        resources: &Arc<ServerResources>,
    ) -> ProgressEngine<crate::database::SqliteStore> {
        ProgressEngine::new(Arc::clone(&resources.database))
    }

    /// Handle GET /api/dashboard - Progress summary and countdown
    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let profile = resources.database.get_profile(auth.user_id).await?;
        let today = Utc::now().date_naive();
        let summary = Self::progress_engine(&resources)
            .summary(auth.user_id, today)
            .await?;

        let response = DashboardResponse {
            username: profile.as_ref().and_then(|p| p.username.clone()),
            onboarded: profile.as_ref().is_some_and(|p| p.onboarded),
            weight_percent: summary.weight_percent,
            miles_percent: summary.miles_percent,
            streak_percent: summary.streak_percent,
            current_streak: summary.current_streak,
            days_until_event: days_until(resources.config.event_date, today),
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/entries/weight - Log a weight measurement
    async fn handle_add_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<AddWeightRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        if !body.weight.is_finite() || body.weight <= 0.0 {
            return Err(AppError::invalid_input("weight must be a positive number"));
        }

        let entry = WeightEntry {
            date: body.date.unwrap_or_else(Utc::now),
            weight: body.weight,
        };
        resources
            .database
            .add_weight_entry(auth.user_id, &entry)
            .await?;

        let percent = Self::progress_engine(&resources)
            .weight_progress_for(auth.user_id)
            .await?;

        Ok((StatusCode::CREATED, Json(EntryAddedResponse { percent })).into_response())
    }

    /// Handle GET /api/entries/weight - Weight history, newest first
    async fn handle_weight_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let entries = resources.database.weight_history(auth.user_id).await?;
        let response = HistoryResponse {
            total: entries.len(),
            entries,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/entries/runs - Log a run
    async fn handle_add_run(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<AddRunRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        if !body.distance.is_finite() || body.distance <= 0.0 {
            return Err(AppError::invalid_input("distance must be a positive number"));
        }

        let entry = RunEntry {
            date: body.date.unwrap_or_else(Utc::now),
            distance: body.distance,
        };
        resources
            .database
            .add_run_entry(auth.user_id, &entry)
            .await?;

        let percent = Self::progress_engine(&resources)
            .miles_progress_for(auth.user_id)
            .await?;

        Ok((StatusCode::CREATED, Json(EntryAddedResponse { percent })).into_response())
    }

    /// Handle GET /api/entries/runs - Run history, newest first
    async fn handle_run_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let entries = resources.database.run_history(auth.user_id).await?;
        let response = HistoryResponse {
            total: entries.len(),
            entries,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/entries/eating-well - Log today as an eating-well day
    async fn handle_add_eating_well(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Option<Json<AddEatingWellRequest>>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let date = body
            .and_then(|Json(request)| request.date)
            .unwrap_or_else(Utc::now);
        let entry = EatingWellEntry {
            date,
            ate_well: true,
        };
        resources
            .database
            .add_eating_well_entry(auth.user_id, &entry)
            .await?;

        let today = Utc::now().date_naive();
        let summary = Self::progress_engine(&resources)
            .summary(auth.user_id, today)
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(EntryAddedResponse {
                percent: summary.streak_percent,
            }),
        )
            .into_response())
    }

    /// Handle GET /api/entries/eating-well - Eating-well history, newest first
    async fn handle_eating_well_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let entries = resources.database.eating_well_history(auth.user_id).await?;
        let response = HistoryResponse {
            total: entries.len(),
            entries,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
