// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Holds shared database, auth, session, and storage handles for routes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! Centralized resource container for dependency injection.
//!
//! Expensive shared resources are created once at startup and handed to the
//! routers behind `Arc`s; handlers never construct their own.

use crate::auth::{AuthManager, SessionHub};
use crate::config::environment::ServerConfig;
use crate::database::SqliteStore;
use crate::storage::AvatarStorage;
use std::sync::Arc;

/// Shared server resources injected into every route handler
#[derive(Clone)]
pub struct ServerResources {
    /// Storage backend
    pub database: Arc<SqliteStore>,
    /// Session token manager
    pub auth_manager: Arc<AuthManager>,
    /// Session-state transition hub
    pub session_hub: Arc<SessionHub>,
    /// Avatar object storage, when configured
    pub avatar_storage: Option<Arc<AvatarStorage>>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    pub fn new(
        database: SqliteStore,
        auth_manager: AuthManager,
        avatar_storage: Option<AvatarStorage>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            session_hub: Arc::new(SessionHub::new()),
            avatar_storage: avatar_storage.map(Arc::new),
            config,
        }
    }
}
