// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, resource, and user creation helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `wedfit_server`

use anyhow::Result;
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use std::sync::{Arc, Once};
use uuid::Uuid;
use wedfit_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::{
        AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig,
    },
    database::{FitnessStore, SqliteStore},
    models::{EatingWellEntry, Goal, RunEntry, User, UserProfile, WeightEntry},
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
pub async fn create_test_store() -> Result<Arc<SqliteStore>> {
    init_test_logging();
    let store = SqliteStore::new("sqlite::memory:").await?;
    Ok(Arc::new(store))
}

/// Create test authentication manager with a random secret
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(generate_jwt_secret().to_vec(), 24)
}

/// Server configuration for tests, no environment access
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        auth: AuthConfig {
            jwt_secret: None,
            jwt_expiry_hours: 24,
        },
        event_date: NaiveDate::from_ymd_opt(2026, 5, 24).unwrap(),
        avatar_storage: None,
    }
}

/// Full resource container over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let store = SqliteStore::new("sqlite::memory:").await?;
    Ok(Arc::new(ServerResources::new(
        store,
        create_test_auth_manager(),
        None,
        Arc::new(create_test_config()),
    )))
}

/// Create a standard test user
pub async fn create_test_user(store: &SqliteStore) -> Result<(Uuid, User)> {
    create_test_user_with_email(store, "test@example.com").await
}

/// Create a test user with a custom email
pub async fn create_test_user_with_email(store: &SqliteStore, email: &str) -> Result<(Uuid, User)> {
    let user = User::new(email.into(), "test_hash".into());
    let user_id = user.id;

    store.create_user(&user).await?;
    store.update_profile(&UserProfile::new(user_id)).await?;
    Ok((user_id, user))
}

/// Create a user with a completed, goal-configured profile
pub async fn create_onboarded_user(
    store: &SqliteStore,
    username: &str,
    initial_weight: f64,
    goal: Goal,
) -> Result<Uuid> {
    let email = format!("{username}@example.com");
    let (user_id, _) = create_test_user_with_email(store, &email).await?;

    let mut profile = UserProfile::new(user_id);
    profile.username = Some(username.to_owned());
    profile.initial_weight = Some(initial_weight);
    profile.goal = goal;
    profile.onboarded = true;
    store.update_profile(&profile).await?;

    Ok(user_id)
}

/// A goal used by most aggregation tests
pub fn standard_goal() -> Goal {
    Goal {
        target_weight: Some(180.0),
        target_miles: Some(4.0),
        target_streak: Some(14),
    }
}

/// Noon UTC on the given calendar day
pub fn noon(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(date.year(), date.month(), date.day(), 12, 0, 0)
        .unwrap()
}

/// Log a weight measurement on the given day
pub async fn log_weight(
    store: &SqliteStore,
    user_id: Uuid,
    date: NaiveDate,
    weight: f64,
) -> Result<()> {
    store
        .add_weight_entry(user_id, &WeightEntry { date: noon(date), weight })
        .await
}

/// Log a run on the given day
pub async fn log_run(
    store: &SqliteStore,
    user_id: Uuid,
    date: NaiveDate,
    distance: f64,
) -> Result<()> {
    store
        .add_run_entry(user_id, &RunEntry { date: noon(date), distance })
        .await
}

/// Log an eating-well day
pub async fn log_eating_well(store: &SqliteStore, user_id: Uuid, date: NaiveDate) -> Result<()> {
    store
        .add_eating_well_entry(
            user_id,
            &EatingWellEntry {
                date: noon(date),
                ate_well: true,
            },
        )
        .await
}
