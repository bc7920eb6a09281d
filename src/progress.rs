// ABOUTME: Progress calculation and streak computation engine for fitness goals
// ABOUTME: Derives percentage-complete metrics and the eating-well streak from entry history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Goal progress and streak computation.
//!
//! The percentage math and the streak walk are pure, synchronous functions:
//! no shared state, no side effects, no clock access. [`ProgressEngine`]
//! wraps them with the entry fetches, taking a user ID and a store
//! explicitly. Missing configuration (no profile, no goal, no entries) is a
//! defined zero result, never an error.

use crate::database::FitnessStore;
use crate::models::{EatingWellEntry, UserProfile};
use crate::utils::day_of;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// A user's progress toward all three goals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Weight goal progress, 0-100
    pub weight_percent: f64,
    /// Running goal progress, 0-100
    pub miles_percent: f64,
    /// Eating-well streak goal progress, 0-100
    pub streak_percent: f64,
    /// Consecutive eating-well days ending yesterday
    pub current_streak: u32,
}

/// Progress toward the target weight, as a percentage in [0, 100].
///
/// A target below the baseline is a loss goal, above it a gain goal; in both
/// directions regression past the start floors at 0 and overshoot past the
/// target caps at 100. A target equal to the baseline is a maintenance goal:
/// holding the baseline counts as 100, anything else as 0.
pub fn weight_progress(initial_weight: f64, target_weight: f64, current_weight: f64) -> f64 {
    if !initial_weight.is_finite() || !target_weight.is_finite() || !current_weight.is_finite() {
        return 0.0;
    }

    if (target_weight - initial_weight).abs() < f64::EPSILON {
        return if (current_weight - initial_weight).abs() < f64::EPSILON {
            100.0
        } else {
            0.0
        };
    }

    let ratio = if target_weight < initial_weight {
        // Goal is to lose weight
        (initial_weight - current_weight) / (initial_weight - target_weight)
    } else {
        // Goal is to gain weight
        (current_weight - initial_weight) / (target_weight - initial_weight)
    };

    (ratio.max(0.0) * 100.0).min(100.0)
}

/// Progress toward the single-run distance goal, as a percentage in [0, 100].
///
/// `max_distance` is the personal-best single run, not a cumulative total.
pub fn miles_progress(target_miles: f64, max_distance: f64) -> f64 {
    if !target_miles.is_finite() || target_miles <= 0.0 || !max_distance.is_finite() {
        return 0.0;
    }

    (max_distance / target_miles).min(1.0).max(0.0) * 100.0
}

/// Progress toward the streak goal, as a percentage in [0, 100].
pub fn streak_progress(target_streak: i64, current_streak: u32) -> f64 {
    if target_streak <= 0 {
        return 0.0;
    }

    (f64::from(current_streak) / target_streak as f64).min(1.0) * 100.0
}

/// Length of the unbroken run of eating-well days ending yesterday.
///
/// Entry timestamps are canonicalized to calendar days up front; the walk
/// itself is pure date arithmetic. A day qualifies when any entry on that
/// day has `ate_well` set. Today's entry, if present, is deliberately
/// excluded: the streak is counted from yesterday backward and breaks at
/// the first day without a qualifying entry.
pub fn current_streak(entries: &[EatingWellEntry], today: NaiveDate) -> u32 {
    let qualifying_days: HashSet<NaiveDate> = entries
        .iter()
        .filter(|entry| entry.ate_well)
        .map(|entry| day_of(entry.date))
        .collect();

    let mut streak = 0;
    let mut expected = match today.pred_opt() {
        Some(yesterday) => yesterday,
        None => return 0,
    };

    while qualifying_days.contains(&expected) {
        streak += 1;
        match expected.pred_opt() {
            Some(previous) => expected = previous,
            None => break,
        }
    }

    streak
}

/// Progress engine bound to a store.
///
/// Read-only consumer of the entry history: it never mutates entries and
/// holds no per-user state.
pub struct ProgressEngine<S: FitnessStore> {
    store: Arc<S>,
}

impl<S: FitnessStore> ProgressEngine<S> {
    /// Create an engine over the given store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Weight goal progress for one user; 0 when baseline, target, or
    /// entries are missing
    pub async fn weight_progress_for(&self, user_id: Uuid) -> Result<f64> {
        let Some(profile) = self.store.get_profile(user_id).await? else {
            return Ok(0.0);
        };

        let (Some(initial), Some(target)) = (profile.initial_weight, profile.goal.target_weight)
        else {
            return Ok(0.0);
        };

        match self.store.latest_weight(user_id).await? {
            Some(latest) => Ok(weight_progress(initial, target, latest.weight)),
            None => Ok(0.0),
        }
    }

    /// Running goal progress for one user; 0 when no target is configured
    pub async fn miles_progress_for(&self, user_id: Uuid) -> Result<f64> {
        let Some(profile) = self.store.get_profile(user_id).await? else {
            return Ok(0.0);
        };

        let Some(target_miles) = profile.goal.target_miles else {
            return Ok(0.0);
        };

        let max_distance = self.store.max_run_distance(user_id).await?;
        Ok(miles_progress(target_miles, max_distance))
    }

    /// Current eating-well streak for one user
    pub async fn streak_for(&self, user_id: Uuid, today: NaiveDate) -> Result<u32> {
        let entries = self.store.eating_well_history(user_id).await?;
        Ok(current_streak(&entries, today))
    }

    /// All three progress metrics for one user
    pub async fn summary(&self, user_id: Uuid, today: NaiveDate) -> Result<ProgressSummary> {
        match self.store.get_profile(user_id).await? {
            Some(profile) => self.summary_for_profile(&profile, today).await,
            None => Ok(ProgressSummary::default()),
        }
    }

    /// All three progress metrics for an already-fetched profile.
    ///
    /// Used by the leaderboard, which has the profile in hand and must not
    /// refetch it per metric.
    pub async fn summary_for_profile(
        &self,
        profile: &UserProfile,
        today: NaiveDate,
    ) -> Result<ProgressSummary> {
        let weight_percent = match (profile.initial_weight, profile.goal.target_weight) {
            (Some(initial), Some(target)) => {
                match self.store.latest_weight(profile.user_id).await? {
                    Some(latest) => weight_progress(initial, target, latest.weight),
                    None => 0.0,
                }
            }
            _ => 0.0,
        };

        let miles_percent = match profile.goal.target_miles {
            Some(target) => {
                let max_distance = self.store.max_run_distance(profile.user_id).await?;
                miles_progress(target, max_distance)
            }
            None => 0.0,
        };

        let entries = self.store.eating_well_history(profile.user_id).await?;
        let current = current_streak(&entries, today);
        let streak_percent = profile
            .goal
            .target_streak
            .map_or(0.0, |target| streak_progress(target, current));

        Ok(ProgressSummary {
            weight_percent,
            miles_percent,
            streak_percent,
            current_streak: current,
        })
    }
}
