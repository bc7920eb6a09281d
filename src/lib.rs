// ABOUTME: Main library entry point for the WedFit fitness tracking API
// ABOUTME: Provides the REST API, progress engine, and storage layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

#![deny(unsafe_code)]

//! # WedFit Server
//!
//! The backend for the wedding-countdown fitness challenge: friends log
//! weight, runs, and eating-well days toward personal goals, watch their
//! progress percentages, compare themselves on a leaderboard, and chat.
//!
//! ## Architecture
//!
//! - **Models**: shared data structures for users, profiles, goals, and
//!   entries
//! - **Database**: the [`database::FitnessStore`] trait with a SQLite
//!   implementation; entries are append-only per user
//! - **Progress**: pure progress/streak math plus an engine binding it to a
//!   store
//! - **Leaderboard**: parallel per-user aggregation over the progress engine
//! - **Routes**: the axum REST surface consumed by the frontend
//!
//! ## Example
//!
//! ```rust,no_run
//! use wedfit_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("WedFit server configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication, password hashing, and session-state tracking
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Storage abstraction layer with the SQLite backend
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Leaderboard aggregation and ranking
pub mod leaderboard;

/// Production logging and structured output
pub mod logging;

/// Common data models
pub mod models;

/// Progress calculation and streak computation engine
pub mod progress;

/// Centralized resource container for dependency injection
pub mod resources;

/// `HTTP` routes for the REST API
pub mod routes;

/// Object storage for profile pictures
pub mod storage;

/// Calendar utilities
pub mod utils;
