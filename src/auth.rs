// ABOUTME: JWT-based user authentication and session-state tracking
// ABOUTME: Handles password hashing, token generation and validation, and session transitions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! # Authentication and Session Management
//!
//! This module provides JWT-based authentication for the WedFit server plus
//! an explicit session-state subscription interface: interested components
//! subscribe to the [`SessionHub`] and receive a [`SessionTransition`] each
//! time a user signs in, completes onboarding, or signs out. Dropping the
//! receiver unsubscribes.

use crate::constants::limits::{SESSION_BROADCAST_CHANNEL_SIZE, USER_SESSION_EXPIRY_HOURS};
use crate::constants::time_constants::SECONDS_PER_HOUR;
use crate::errors::AppError;
use crate::models::User;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / i64::from(SECONDS_PER_HOUR);
    let minutes = (total_secs % i64::from(SECONDS_PER_HOUR)) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// Generate a random secret suitable for signing session tokens
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

/// Verify a password against its stored hash
///
/// # Errors
///
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    bcrypt::verify(password, password_hash).context("Failed to verify password")
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let duration_expired = current_time.signed_duration_since(*expired_at);
                write!(
                    f,
                    "JWT token expired {} ago at {}",
                    humanize_duration(duration_expired),
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match &error {
            JwtValidationError::TokenExpired { .. } => AppError::auth_expired(),
            JwtValidationError::TokenInvalid { reason } => AppError::auth_invalid(reason.clone()),
            JwtValidationError::TokenMalformed { details } => AppError::new(
                crate::errors::ErrorCode::AuthMalformed,
                details.clone(),
            ),
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication result with user context
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
    /// Authenticated user email
    pub email: String,
}

/// Session lifecycle states observed by subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No active session
    SignedOut,
    /// Signed in but onboarding has not been completed
    PendingOnboarding,
    /// Signed in with a completed profile
    Onboarded,
}

/// A session-state change for one user, delivered to hub subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    /// User whose session changed
    pub user_id: Uuid,
    /// The state entered
    pub state: SessionState,
    /// When the transition happened
    pub at: DateTime<Utc>,
}

/// Broadcast hub for session-state transitions.
///
/// Replaces an ambient auth listener: components that care about sign-in,
/// onboarding completion, or sign-out subscribe explicitly and unsubscribe
/// by dropping the receiver.
#[derive(Debug)]
pub struct SessionHub {
    sender: broadcast::Sender<SessionTransition>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    /// Create a hub with the default channel capacity
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SESSION_BROADCAST_CHANNEL_SIZE);
        Self { sender }
    }

    /// Subscribe to session transitions; drop the receiver to unsubscribe
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionTransition> {
        self.sender.subscribe()
    }

    /// Publish a transition. Lagging or absent subscribers are not an error.
    pub fn publish(&self, user_id: Uuid, state: SessionState) {
        let transition = SessionTransition {
            user_id,
            state,
            at: Utc::now(),
        };
        if self.sender.send(transition).is_err() {
            tracing::trace!("No session subscribers, dropping {state:?} for {user_id}");
        }
    }
}

/// Authentication manager for `JWT` tokens and user sessions
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    /// Monotonic counter to ensure unique issued-at timestamps
    token_counter: AtomicU64,
}

impl AuthManager {
    /// Create a new authentication manager from a signing secret
    #[must_use]
    pub fn new(jwt_secret: Vec<u8>, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&jwt_secret),
            decoding_key: DecodingKey::from_secret(&jwt_secret),
            token_expiry_hours,
            token_counter: AtomicU64::new(0),
        }
    }

    /// Create a manager with the default session expiry
    #[must_use]
    pub fn with_default_expiry(jwt_secret: Vec<u8>) -> Self {
        Self::new(jwt_secret, USER_SESSION_EXPIRY_HOURS)
    }

    /// Generate a `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        // Atomic counter keeps issued-at values unique across rapid calls
        let counter = self.token_counter.fetch_add(1, Ordering::Relaxed);
        let unique_iat =
            now.timestamp() * 1000 + i64::from(u32::try_from(counter % 1000).unwrap_or(0));

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: unique_iat,
            exp: expiry.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode session token")?;

        Ok(token)
    }

    /// Validate a `JWT` token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing whether the token was
    /// expired, malformed, or carried an invalid signature
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(e) => Err(Self::convert_jwt_error(&e, token, &self.decoding_key)),
        }
    }

    /// Authenticate an `Authorization` header value (`Bearer <token>`)
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] with the matching auth error code when the
    /// header is missing the Bearer scheme or the token fails validation
    pub fn authenticate(&self, auth_header: &str) -> Result<AuthResult, AppError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer scheme"))?;

        let claims = self.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user ID"))?;

        Ok(AuthResult {
            user_id,
            email: claims.email,
        })
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(
        e: &jsonwebtoken::errors::Error,
        token: &str,
        decoding_key: &DecodingKey,
    ) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                // Decode once more without expiry validation to report when
                // the token actually expired
                let mut validation = Validation::new(Algorithm::HS256);
                validation.validate_exp = false;
                let expired_at = decode::<Claims>(token, decoding_key, &validation)
                    .ok()
                    .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
                    .unwrap_or_else(Utc::now);
                let current_time = Utc::now();
                tracing::warn!(
                    "JWT token expired {} ago at {}",
                    humanize_duration(current_time.signed_duration_since(expired_at)),
                    expired_at.to_rfc3339()
                );
                JwtValidationError::TokenExpired {
                    expired_at,
                    current_time,
                }
            }
            ErrorKind::InvalidSignature => {
                tracing::warn!("JWT token signature verification failed");
                JwtValidationError::TokenInvalid {
                    reason: "Token signature verification failed".into(),
                }
            }
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                tracing::warn!("JWT token format is invalid: {e:?}");
                JwtValidationError::TokenMalformed {
                    details: "Token format is invalid".into(),
                }
            }
            _ => JwtValidationError::TokenInvalid {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new("angela@example.com".into(), "hash".into())
    }

    fn test_manager() -> AuthManager {
        AuthManager::new(generate_jwt_secret().to_vec(), 24)
    }

    #[test]
    fn test_generate_and_validate_token() {
        let manager = test_manager();
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = AuthManager::new(generate_jwt_secret().to_vec(), -1);
        let token = manager.generate_token(&test_user()).unwrap();

        match manager.validate_token(&token) {
            Err(JwtValidationError::TokenExpired { .. }) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager_a = test_manager();
        let manager_b = test_manager();
        let token = manager_a.generate_token(&test_user()).unwrap();

        assert!(manager_b.validate_token(&token).is_err());
    }

    #[test]
    fn test_authenticate_requires_bearer_scheme() {
        let manager = test_manager();
        let token = manager.generate_token(&test_user()).unwrap();

        assert!(manager.authenticate(&token).is_err());
        assert!(manager.authenticate(&format!("Bearer {token}")).is_ok());
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_session_hub_delivers_transitions() {
        let hub = SessionHub::new();
        let mut rx = hub.subscribe();
        let user_id = Uuid::new_v4();

        hub.publish(user_id, SessionState::PendingOnboarding);
        hub.publish(user_id, SessionState::Onboarded);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.state, SessionState::PendingOnboarding);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.state, SessionState::Onboarded);
        assert_eq!(second.user_id, user_id);
    }

    #[test]
    fn test_session_hub_without_subscribers() {
        let hub = SessionHub::new();
        // Publishing with nobody listening must not fail
        hub.publish(Uuid::new_v4(), SessionState::SignedOut);
    }
}
