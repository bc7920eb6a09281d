// ABOUTME: Leaderboard aggregation built on the progress engine
// ABOUTME: Fans out per-user progress computation and ranks the results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Leaderboard aggregation.
//!
//! One retrieval-plus-compute task per onboarded user, run concurrently and
//! joined before ranking. A failure computing one user's metrics never
//! aborts the batch: that user degrades to zero-valued progress and the
//! aggregation continues.

use crate::database::FitnessStore;
use crate::progress::{ProgressEngine, ProgressSummary};
use anyhow::Result;
use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Number of users featured in the kudos section
const KUDOS_COUNT: usize = 3;

/// One user's row on the leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// User identifier
    pub user_id: Uuid,
    /// Display name
    pub username: String,
    /// Profile picture URL, if uploaded
    pub profile_picture: Option<String>,
    /// Progress across all three metrics
    pub progress: ProgressSummary,
}

/// The metric a ranking is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Weight goal progress
    Weight,
    /// Running goal progress
    Miles,
    /// Eating-well streak progress
    Streak,
}

impl Metric {
    fn percent(self, entry: &LeaderboardEntry) -> f64 {
        match self {
            Metric::Weight => entry.progress.weight_percent,
            Metric::Miles => entry.progress.miles_percent,
            Metric::Streak => entry.progress.streak_percent,
        }
    }
}

/// Complete leaderboard: one ranking per metric plus the kudos podium
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standings {
    /// Ranked by weight goal progress
    pub weight: Vec<LeaderboardEntry>,
    /// Ranked by running goal progress
    pub miles: Vec<LeaderboardEntry>,
    /// Ranked by streak goal progress
    pub streak: Vec<LeaderboardEntry>,
    /// Top current streaks, longest first, zero streaks excluded
    pub kudos: Vec<LeaderboardEntry>,
}

/// Rank entries by one metric, descending, with a deterministic username
/// tie-break.
pub fn rank_by(entries: &[LeaderboardEntry], metric: Metric) -> Vec<LeaderboardEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| {
        metric
            .percent(b)
            .partial_cmp(&metric.percent(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.username.cmp(&b.username))
    });
    ranked
}

/// The top `count` entries by current streak, excluding users with no
/// active streak.
pub fn top_streaks(entries: &[LeaderboardEntry], count: usize) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<LeaderboardEntry> = entries
        .iter()
        .filter(|entry| entry.progress.current_streak > 0)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.progress
            .current_streak
            .cmp(&a.progress.current_streak)
            .then_with(|| a.username.cmp(&b.username))
    });
    ranked.truncate(count);
    ranked
}

/// Leaderboard aggregator over a store
pub struct LeaderboardEngine<S: FitnessStore> {
    store: Arc<S>,
    progress: ProgressEngine<S>,
}

impl<S: FitnessStore> LeaderboardEngine<S> {
    /// Create an aggregator over the given store
    pub fn new(store: Arc<S>) -> Self {
        let progress = ProgressEngine::new(Arc::clone(&store));
        Self { store, progress }
    }

    /// Compute every onboarded user's progress, in parallel.
    ///
    /// Only the initial profile listing can fail the batch; per-user metric
    /// retrieval failures are logged and substituted with zero progress.
    pub async fn compute(&self, today: NaiveDate) -> Result<Vec<LeaderboardEntry>> {
        let profiles = self.store.list_onboarded_profiles().await?;

        let tasks = profiles.into_iter().map(|profile| {
            let engine = &self.progress;
            async move {
                let progress = match engine.summary_for_profile(&profile, today).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(
                            user_id = %profile.user_id,
                            "Failed to compute progress for leaderboard: {e}"
                        );
                        ProgressSummary::default()
                    }
                };

                LeaderboardEntry {
                    user_id: profile.user_id,
                    username: profile.display_name().to_owned(),
                    profile_picture: profile.profile_picture.clone(),
                    progress,
                }
            }
        });

        Ok(join_all(tasks).await)
    }

    /// The full leaderboard: per-metric rankings plus the kudos podium
    pub async fn standings(&self, today: NaiveDate) -> Result<Standings> {
        let entries = self.compute(today).await?;

        Ok(Standings {
            weight: rank_by(&entries, Metric::Weight),
            miles: rank_by(&entries, Metric::Miles),
            streak: rank_by(&entries, Metric::Streak),
            kudos: top_streaks(&entries, KUDOS_COUNT),
        })
    }
}
