// ABOUTME: Server binary for the WedFit fitness tracking API
// ABOUTME: Loads configuration, initializes resources, and serves the REST API
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # WedFit Server Binary
//!
//! Starts the WedFit REST API with user authentication and SQLite-backed
//! storage.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use wedfit_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::ServerConfig,
    database::SqliteStore,
    logging,
    resources::ServerResources,
    routes,
    storage::AvatarStorage,
};

#[derive(Parser)]
#[command(name = "wedfit-server")]
#[command(about = "WedFit - fitness goal tracking API for the wedding countdown challenge")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting WedFit server");
    info!("{}", config.summary());

    // Initialize database
    let database = SqliteStore::new(&config.database.url.to_connection_string()).await?;
    info!(
        "Database initialized: {}",
        config.database.url.to_connection_string()
    );

    // Session token signing secret; an ephemeral one invalidates sessions on
    // restart, so production deployments should set JWT_SECRET
    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => secret.clone().into_bytes(),
        None => {
            warn!("JWT_SECRET not set, generating an ephemeral signing secret");
            generate_jwt_secret().to_vec()
        }
    };
    let auth_manager = AuthManager::new(jwt_secret, config.auth.jwt_expiry_hours);

    // Avatar object storage is optional
    let avatar_storage = match &config.avatar_storage {
        Some(avatar_config) => {
            let storage = AvatarStorage::from_config(avatar_config).await;
            info!("Avatar storage enabled on bucket {}", avatar_config.bucket);
            Some(storage)
        }
        None => {
            info!("Avatar storage disabled (no bucket configured)");
            None
        }
    };

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        avatar_storage,
        Arc::new(config),
    ));

    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;
    info!("WedFit server listening on port {http_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("WedFit server shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
}
