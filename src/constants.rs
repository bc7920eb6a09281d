// ABOUTME: System-wide constants and configuration values for the WedFit API
// ABOUTME: Environment variable names, limits, and deployment defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! Application constants, grouped by concern.

/// Service identification
pub mod service_names {
    /// Canonical service name used in logs and health responses
    pub const WEDFIT_SERVER: &str = "wedfit-server";
}

/// Environment variable names read at startup
pub mod env_config {
    /// Database connection string (`sqlite:...` or `sqlite::memory:`)
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Secret used to sign session tokens
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Session token lifetime in hours
    pub const JWT_EXPIRY_HOURS: &str = "JWT_EXPIRY_HOURS";
    /// The wedding date the countdown runs toward (`YYYY-MM-DD`)
    pub const EVENT_DATE: &str = "EVENT_DATE";
    /// Bucket for profile pictures; avatar uploads are disabled when unset
    pub const AVATAR_BUCKET: &str = "AVATAR_BUCKET";
    /// Public base URL under which uploaded avatars are served
    pub const AVATAR_PUBLIC_BASE_URL: &str = "AVATAR_PUBLIC_BASE_URL";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Runtime limits
pub mod limits {
    /// Hours a session token stays valid by default
    pub const USER_SESSION_EXPIRY_HOURS: i64 = 24;
    /// Chat messages returned when no limit is given
    pub const CHAT_DEFAULT_LIMIT: u32 = 50;
    /// Hard cap on a single chat page
    pub const CHAT_MAX_LIMIT: u32 = 200;
    /// Longest accepted chat message, in characters
    pub const CHAT_MAX_MESSAGE_CHARS: usize = 1_000;
    /// Largest accepted avatar upload, in bytes
    pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;
    /// Buffer size for the session-state broadcast channel
    pub const SESSION_BROADCAST_CHANNEL_SIZE: usize = 64;
    /// Minimum accepted password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 8;
}

/// Deployment defaults applied when the environment is silent
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:data/wedfit.db";
    /// Default wedding date (May 24, 2026)
    pub const EVENT_DATE: &str = "2026-05-24";
}

/// Time conversion constants
pub mod time_constants {
    /// Seconds in one hour
    pub const SECONDS_PER_HOUR: u32 = 3600;
}
