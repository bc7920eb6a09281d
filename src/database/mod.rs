// ABOUTME: Storage abstraction layer for the WedFit server
// ABOUTME: Defines the FitnessStore trait the progress engine and routes consume
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Storage abstraction for users, profiles, metric entries, and chat.
//!
//! The progress engine and the leaderboard aggregator only ever see this
//! trait; they take a store and a user ID explicitly rather than reaching
//! into ambient state. Entries are append-only and the history readers
//! return them newest-first.

use crate::models::{ChatMessage, EatingWellEntry, RunEntry, User, UserProfile, WeightEntry};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Core storage abstraction trait
///
/// All storage implementations must implement this trait to provide a
/// consistent interface for the application layer.
#[async_trait]
pub trait FitnessStore: Send + Sync {
    // ================================
    // User Management
    // ================================

    /// Create a new user account
    async fn create_user(&self, user: &User) -> Result<Uuid>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by email address
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Update user's last active timestamp
    async fn update_last_active(&self, user_id: Uuid) -> Result<()>;

    // ================================
    // Profiles & Goals
    // ================================

    /// Get a user's profile
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Write a user's profile (username, picture, baseline weight, goal)
    async fn update_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Mark the one-time onboarding step as completed
    async fn complete_onboarding(&self, user_id: Uuid) -> Result<()>;

    /// All profiles that completed onboarding, the leaderboard population
    async fn list_onboarded_profiles(&self) -> Result<Vec<UserProfile>>;

    // ================================
    // Metric Entries (append-only)
    // ================================

    /// Append a weight measurement
    async fn add_weight_entry(&self, user_id: Uuid, entry: &WeightEntry) -> Result<()>;

    /// Weight history, newest first
    async fn weight_history(&self, user_id: Uuid) -> Result<Vec<WeightEntry>>;

    /// The most recent weight measurement, if any
    async fn latest_weight(&self, user_id: Uuid) -> Result<Option<WeightEntry>>;

    /// Append a run
    async fn add_run_entry(&self, user_id: Uuid, entry: &RunEntry) -> Result<()>;

    /// Run history, newest first
    async fn run_history(&self, user_id: Uuid) -> Result<Vec<RunEntry>>;

    /// Longest single run on record; 0 when the user has no runs
    async fn max_run_distance(&self, user_id: Uuid) -> Result<f64>;

    /// Append an "ate well" log entry
    async fn add_eating_well_entry(&self, user_id: Uuid, entry: &EatingWellEntry) -> Result<()>;

    /// Eating-well history, newest first
    async fn eating_well_history(&self, user_id: Uuid) -> Result<Vec<EatingWellEntry>>;

    // ================================
    // Chat
    // ================================

    /// Append a chat message
    async fn add_chat_message(&self, message: &ChatMessage) -> Result<()>;

    /// The most recent chat messages, newest first
    async fn recent_chat_messages(&self, limit: u32) -> Result<Vec<ChatMessage>>;
}
