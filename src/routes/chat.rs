// ABOUTME: Chat route handlers for the shared group chat
// ABOUTME: Provides REST endpoints for posting and listing chat messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 WedFit

//! Group chat routes.
//!
//! Messages carry a snapshot of the author's display name and picture taken
//! at post time, so renames do not rewrite history.

use crate::constants::limits::{CHAT_DEFAULT_LIMIT, CHAT_MAX_LIMIT, CHAT_MAX_MESSAGE_CHARS};
use crate::database::FitnessStore;
use crate::errors::AppError;
use crate::models::ChatMessage;
use crate::resources::ServerResources;
use crate::routes::authenticate;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to post a chat message
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    /// Message body
    pub message: String,
}

/// One chat message in a response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    /// Message ID
    pub id: String,
    /// Author's user ID
    pub user_id: String,
    /// Author's display name at post time
    pub username: String,
    /// Author's profile picture at post time
    pub profile_picture: Option<String>,
    /// Message body
    pub message: String,
    /// When the message was posted
    pub created_at: String,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            user_id: message.user_id.to_string(),
            username: message.username,
            profile_picture: message.profile_picture,
            message: message.message,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Response listing recent messages
#[derive(Debug, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    /// Messages, newest first
    pub messages: Vec<ChatMessageResponse>,
    /// Total count in this page
    pub total: usize,
}

/// Query parameters for listing messages
#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    /// Maximum messages to return
    pub limit: Option<u32>,
}

// ============================================================================
// Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat", get(Self::handle_list_messages))
            .route("/api/chat", post(Self::handle_post_message))
            .with_state(resources)
    }

    /// Handle GET /api/chat - Recent messages, newest first
    async fn handle_list_messages(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListMessagesQuery>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;

        let limit = query.limit.unwrap_or(CHAT_DEFAULT_LIMIT).min(CHAT_MAX_LIMIT);
        let messages = resources.database.recent_chat_messages(limit).await?;

        let response = ListMessagesResponse {
            total: messages.len(),
            messages: messages.into_iter().map(Into::into).collect(),
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/chat - Post a message
    async fn handle_post_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<PostMessageRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let message = body.message.trim();
        if message.is_empty() {
            return Err(AppError::invalid_input("message must not be empty"));
        }
        if message.chars().count() > CHAT_MAX_MESSAGE_CHARS {
            return Err(AppError::invalid_input(format!(
                "message exceeds the {CHAT_MAX_MESSAGE_CHARS} character limit"
            )));
        }

        // Snapshot the author's current name and picture into the message
        let profile = resources.database.get_profile(auth.user_id).await?;
        let username = profile
            .as_ref()
            .map_or_else(|| "Anonymous".to_owned(), |p| p.display_name().to_owned());
        let profile_picture = profile.and_then(|p| p.profile_picture);

        let chat_message =
            ChatMessage::new(auth.user_id, username, profile_picture, message.to_owned());
        resources.database.add_chat_message(&chat_message).await?;

        Ok((
            StatusCode::CREATED,
            Json(ChatMessageResponse::from(chat_message)),
        )
            .into_response())
    }
}
