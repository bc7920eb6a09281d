// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment-driven configuration parsing and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Configuration module for the WedFit server.
//!
//! Configuration is environment-only: every setting is read from environment
//! variables (with a `.env` file honored in development) and validated once
//! at startup.

/// Environment-based configuration management
pub mod environment;
