// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_config, limits};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// On-disk database location
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(DatabaseUrl::Memory)
            } else {
                Ok(DatabaseUrl::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else {
            anyhow::bail!("Unsupported database URL scheme: {s}")
        }
    }

    /// Render back to a sqlx connection string
    pub fn to_connection_string(&self) -> String {
        match self {
            DatabaseUrl::SQLite { path } => format!("sqlite:{}", path.display()),
            DatabaseUrl::Memory => "sqlite::memory:".into(),
        }
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        // Safe: the default URL is a valid sqlite: string
        DatabaseUrl::parse_url(defaults::DATABASE_URL).unwrap_or(DatabaseUrl::Memory)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign session tokens; generated at startup when unset
    pub jwt_secret: Option<String>,
    /// Session token lifetime in hours
    pub jwt_expiry_hours: i64,
}

/// Avatar object-storage configuration; uploads are disabled when absent
#[derive(Debug, Clone)]
pub struct AvatarStorageConfig {
    /// Bucket profile pictures are written to
    pub bucket: String,
    /// Public base URL under which the bucket contents are served
    pub public_base_url: String,
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// The wedding date the countdown runs toward
    pub event_date: NaiveDate,
    /// Avatar storage configuration, when object storage is wired up
    pub avatar_storage: Option<AvatarStorageConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse (a bad port,
    /// an unparseable event date). Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists; absence is normal in production
        if dotenvy::dotenv().is_err() {
            warn!("No .env file found, reading configuration from process environment");
        }

        let http_port = match env::var(env_config::HTTP_PORT) {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid {} value: {port}", env_config::HTTP_PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let database_url = env::var(env_config::DATABASE_URL)
            .unwrap_or_else(|_| defaults::DATABASE_URL.to_owned());

        let event_date_str =
            env::var(env_config::EVENT_DATE).unwrap_or_else(|_| defaults::EVENT_DATE.to_owned());
        let event_date = NaiveDate::parse_from_str(&event_date_str, "%Y-%m-%d")
            .with_context(|| format!("Invalid {} value: {event_date_str}", env_config::EVENT_DATE))?;

        let jwt_expiry_hours = match env::var(env_config::JWT_EXPIRY_HOURS) {
            Ok(hours) => hours.parse::<i64>().with_context(|| {
                format!("Invalid {} value: {hours}", env_config::JWT_EXPIRY_HOURS)
            })?,
            Err(_) => limits::USER_SESSION_EXPIRY_HOURS,
        };

        let avatar_storage = match (
            env::var(env_config::AVATAR_BUCKET),
            env::var(env_config::AVATAR_PUBLIC_BASE_URL),
        ) {
            (Ok(bucket), Ok(public_base_url)) => Some(AvatarStorageConfig {
                bucket,
                public_base_url,
            }),
            (Ok(_), Err(_)) | (Err(_), Ok(_)) => {
                anyhow::bail!(
                    "{} and {} must be set together",
                    env_config::AVATAR_BUCKET,
                    env_config::AVATAR_PUBLIC_BASE_URL
                )
            }
            (Err(_), Err(_)) => None,
        };

        Ok(ServerConfig {
            http_port,
            log_level: LogLevel::from_str_or_default(
                &env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            ),
            environment: Environment::from_str_or_default(
                &env::var(env_config::ENVIRONMENT).unwrap_or_default(),
            ),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&database_url)
                    .with_context(|| format!("Invalid {}", env_config::DATABASE_URL))?,
            },
            auth: AuthConfig {
                jwt_secret: env::var(env_config::JWT_SECRET).ok(),
                jwt_expiry_hours,
            },
            event_date,
            avatar_storage,
        })
    }

    /// Human-readable configuration summary for startup logging
    pub fn summary(&self) -> String {
        format!(
            "WedFit Server Configuration:\n\
             - HTTP Port: {}\n\
             - Log Level: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Event Date: {}\n\
             - Session Expiry: {}h\n\
             - Avatar Storage: {}",
            self.http_port,
            self.log_level,
            self.environment,
            self.database.url.to_connection_string(),
            self.event_date,
            self.auth.jwt_expiry_hours,
            if self.avatar_storage.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        ));
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite:data/wedfit.db").unwrap(),
            DatabaseUrl::SQLite { .. }
        ));
        assert!(DatabaseUrl::parse_url("postgres://nope").is_err());
    }

    #[test]
    fn test_database_url_round_trip() {
        let url = DatabaseUrl::parse_url("sqlite:data/wedfit.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:data/wedfit.db");
        assert_eq!(DatabaseUrl::Memory.to_connection_string(), "sqlite::memory:");
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert!(Environment::from_str_or_default("production").is_production());
        assert_eq!(
            Environment::from_str_or_default(""),
            Environment::Development
        );
    }
}
