// ABOUTME: Leaderboard route handlers for cross-user progress rankings
// ABOUTME: Provides the ranked standings per metric and the kudos podium
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Leaderboard routes

use crate::database::SqliteStore;
use crate::errors::AppError;
use crate::leaderboard::{LeaderboardEngine, LeaderboardEntry, Metric, Standings};
use crate::resources::ServerResources;
use crate::routes::authenticate;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Response Types
// ============================================================================

/// One ranked row in a standings table
#[derive(Debug, Serialize, Deserialize)]
pub struct RankedRowResponse {
    /// 1-based rank within the table
    pub rank: usize,
    /// User ID
    pub user_id: String,
    /// Display name
    pub username: String,
    /// Profile picture URL
    pub profile_picture: Option<String>,
    /// Progress for the table's metric, 0-100
    pub percent: f64,
    /// Consecutive eating-well days ending yesterday
    pub current_streak: u32,
}

/// Complete leaderboard response
#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    /// Ranked by weight goal progress
    pub weight: Vec<RankedRowResponse>,
    /// Ranked by running goal progress
    pub miles: Vec<RankedRowResponse>,
    /// Ranked by streak goal progress
    pub streak: Vec<RankedRowResponse>,
    /// Top current streaks, longest first
    pub kudos: Vec<RankedRowResponse>,
}

fn ranked_rows(entries: &[LeaderboardEntry], metric: Option<Metric>) -> Vec<RankedRowResponse> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| RankedRowResponse {
            rank: index + 1,
            user_id: entry.user_id.to_string(),
            username: entry.username.clone(),
            profile_picture: entry.profile_picture.clone(),
            percent: match metric {
                Some(Metric::Weight) => entry.progress.weight_percent,
                Some(Metric::Miles) => entry.progress.miles_percent,
                Some(Metric::Streak) | None => entry.progress.streak_percent,
            },
            current_streak: entry.progress.current_streak,
        })
        .collect()
}

impl From<Standings> for LeaderboardResponse {
    fn from(standings: Standings) -> Self {
        Self {
            weight: ranked_rows(&standings.weight, Some(Metric::Weight)),
            miles: ranked_rows(&standings.miles, Some(Metric::Miles)),
            streak: ranked_rows(&standings.streak, Some(Metric::Streak)),
            kudos: ranked_rows(&standings.kudos, None),
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Leaderboard routes handler
pub struct LeaderboardRoutes;

impl LeaderboardRoutes {
    /// Create the leaderboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/leaderboard", get(Self::handle_leaderboard))
            .with_state(resources)
    }

    /// Handle GET /api/leaderboard - Rankings across all onboarded users
    async fn handle_leaderboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;

        let engine: LeaderboardEngine<SqliteStore> =
            LeaderboardEngine::new(Arc::clone(&resources.database));
        let standings = engine.standings(Utc::now().date_naive()).await?;

        Ok((StatusCode::OK, Json(LeaderboardResponse::from(standings))).into_response())
    }
}
