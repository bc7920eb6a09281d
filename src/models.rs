// ABOUTME: Core data models and types for the WedFit fitness API
// ABOUTME: Defines User, UserProfile, Goal, metric entries, and chat messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! # Data Models
//!
//! Common data structures shared by the storage layer, the progress engine,
//! and the HTTP routes. Entries are append-only measurements owned by exactly
//! one user; the progress engine consumes them read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address (used for login)
    pub email: String,
    /// Hashed password for authentication
    pub password_hash: String,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// Last time the user accessed the system
    pub last_active: DateTime<Utc>,
    /// Whether the user account is active
    pub is_active: bool,
}

impl User {
    /// Create a new user with a freshly generated ID
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: now,
            last_active: now,
            is_active: true,
        }
    }
}

/// The target values progress percentages are measured against.
///
/// Every field is optional: a goal the user never configured yields the
/// defined zero-progress fallback rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Target body weight, in the user's display unit
    pub target_weight: Option<f64>,
    /// Target single-run distance in miles
    pub target_miles: Option<f64>,
    /// Target consecutive-day eating-well streak
    pub target_streak: Option<i64>,
}

/// Per-user profile created at signup and completed during onboarding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owning user
    pub user_id: Uuid,
    /// Display name shown on the leaderboard and in chat
    pub username: Option<String>,
    /// URL of the uploaded profile picture, if any
    pub profile_picture: Option<String>,
    /// Weight recorded at onboarding, the baseline for weight progress
    pub initial_weight: Option<f64>,
    /// Configured goal targets
    pub goal: Goal,
    /// Whether the one-time onboarding step has been completed
    pub onboarded: bool,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last modified
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The empty profile written at signup, before onboarding
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            username: None,
            profile_picture: None,
            initial_weight: None,
            goal: Goal::default(),
            onboarded: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Leaderboard display name, falling back like the original UI does
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("Anonymous")
    }
}

/// A single logged body-weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// When the measurement was taken
    pub date: DateTime<Utc>,
    /// Measured weight
    pub weight: f64,
}

/// A single logged run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    /// When the run happened
    pub date: DateTime<Utc>,
    /// Distance covered, in miles
    pub distance: f64,
}

/// A single "ate well today" log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EatingWellEntry {
    /// The day being logged
    pub date: DateTime<Utc>,
    /// Whether the user ate well (always true when logged from the app)
    pub ate_well: bool,
}

/// A message in the shared group chat.
///
/// Username and picture are denormalized at post time so old messages keep
/// the name the author had when they wrote them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: Uuid,
    /// Author
    pub user_id: Uuid,
    /// Author's display name at post time
    pub username: String,
    /// Author's profile picture URL at post time
    pub profile_picture: Option<String>,
    /// Message body
    pub message: String,
    /// When the message was posted
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new chat message stamped with the current time
    pub fn new(
        user_id: Uuid,
        username: String,
        profile_picture: Option<String>,
        message: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            profile_picture,
            message,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("angela@example.com".into(), "hash".into());
        assert!(user.is_active);
        assert_eq!(user.created_at, user.last_active);
    }

    #[test]
    fn test_new_profile_not_onboarded() {
        let profile = UserProfile::new(Uuid::new_v4());
        assert!(!profile.onboarded);
        assert_eq!(profile.goal, Goal::default());
        assert_eq!(profile.display_name(), "Anonymous");
    }
}
