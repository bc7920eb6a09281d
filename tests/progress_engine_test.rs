// ABOUTME: Integration tests for the progress engine over the SQLite store
// ABOUTME: Validates zero-fallbacks and store-backed progress computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;
use wedfit_server::models::Goal;
use wedfit_server::progress::{ProgressEngine, ProgressSummary};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_summary_without_profile_is_zero() {
    let store = common::create_test_store().await.unwrap();
    let engine = ProgressEngine::new(Arc::clone(&store));

    let summary = engine
        .summary(Uuid::new_v4(), day(2026, 3, 14))
        .await
        .unwrap();
    assert_eq!(summary, ProgressSummary::default());
}

#[tokio::test]
async fn test_weight_progress_uses_latest_entry() {
    let store = common::create_test_store().await.unwrap();
    let user_id =
        common::create_onboarded_user(&store, "angela", 200.0, common::standard_goal())
            .await
            .unwrap();
    let engine = ProgressEngine::new(Arc::clone(&store));

    // No entries yet
    assert_eq!(engine.weight_progress_for(user_id).await.unwrap(), 0.0);

    common::log_weight(&store, user_id, day(2026, 3, 10), 195.0)
        .await
        .unwrap();
    common::log_weight(&store, user_id, day(2026, 3, 12), 190.0)
        .await
        .unwrap();

    // 190 is the latest: halfway from 200 to 180
    assert_eq!(engine.weight_progress_for(user_id).await.unwrap(), 50.0);
}

#[tokio::test]
async fn test_miles_progress_from_personal_best() {
    let store = common::create_test_store().await.unwrap();
    let user_id =
        common::create_onboarded_user(&store, "angela", 200.0, common::standard_goal())
            .await
            .unwrap();
    let engine = ProgressEngine::new(Arc::clone(&store));

    common::log_run(&store, user_id, day(2026, 3, 10), 2.0)
        .await
        .unwrap();
    assert_eq!(engine.miles_progress_for(user_id).await.unwrap(), 50.0);

    common::log_run(&store, user_id, day(2026, 3, 11), 10.0)
        .await
        .unwrap();
    assert_eq!(engine.miles_progress_for(user_id).await.unwrap(), 100.0);
}

#[tokio::test]
async fn test_missing_goal_fields_fall_back_to_zero() {
    let store = common::create_test_store().await.unwrap();
    let user_id = common::create_onboarded_user(
        &store,
        "angela",
        200.0,
        Goal {
            target_weight: Some(180.0),
            target_miles: None,
            target_streak: None,
        },
    )
    .await
    .unwrap();
    let engine = ProgressEngine::new(Arc::clone(&store));

    common::log_run(&store, user_id, day(2026, 3, 10), 6.0)
        .await
        .unwrap();
    common::log_weight(&store, user_id, day(2026, 3, 10), 180.0)
        .await
        .unwrap();

    let summary = engine.summary(user_id, day(2026, 3, 14)).await.unwrap();
    assert_eq!(summary.weight_percent, 100.0);
    assert_eq!(summary.miles_percent, 0.0);
    assert_eq!(summary.streak_percent, 0.0);
}

#[tokio::test]
async fn test_streak_from_store_entries() {
    let store = common::create_test_store().await.unwrap();
    let user_id =
        common::create_onboarded_user(&store, "angela", 200.0, common::standard_goal())
            .await
            .unwrap();
    let engine = ProgressEngine::new(Arc::clone(&store));

    let today = day(2026, 3, 14);
    common::log_eating_well(&store, user_id, day(2026, 3, 13))
        .await
        .unwrap();
    common::log_eating_well(&store, user_id, day(2026, 3, 12))
        .await
        .unwrap();
    // A logged entry for today does not extend the streak yet
    common::log_eating_well(&store, user_id, today).await.unwrap();

    assert_eq!(engine.streak_for(user_id, today).await.unwrap(), 2);

    let summary = engine.summary(user_id, today).await.unwrap();
    assert_eq!(summary.current_streak, 2);
    // 2 of the 14-day target
    assert!((summary.streak_percent - (2.0 / 14.0) * 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_streak_gap_stops_walk() {
    let store = common::create_test_store().await.unwrap();
    let user_id =
        common::create_onboarded_user(&store, "angela", 200.0, common::standard_goal())
            .await
            .unwrap();
    let engine = ProgressEngine::new(Arc::clone(&store));

    let today = day(2026, 3, 14);
    common::log_eating_well(&store, user_id, day(2026, 3, 13))
        .await
        .unwrap();
    // Gap on the 12th; the 11th must not count
    common::log_eating_well(&store, user_id, day(2026, 3, 11))
        .await
        .unwrap();

    assert_eq!(engine.streak_for(user_id, today).await.unwrap(), 1);
}
