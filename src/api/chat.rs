//! Chat API endpoints.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::{success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{ChatMessage, SendMessageRequest};
use crate::AppState;

/// GET /api/chat - All messages, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
) -> ApiResult<Vec<ChatMessage>> {
    let snapshot = table_store(&state, &session).load::<ChatMessage>().await?;
    let mut messages = snapshot.data;
    messages.sort_by_key(|m| m.id);
    success(messages, snapshot.sha)
}

/// POST /api/chat - Append a message.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<ChatMessage> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (message, sha) = table_store(&state, &session)
        .create::<ChatMessage, _>(expected_sha.as_deref(), |id| {
            ChatMessage::from_request(id, request)
        })
        .await?;
    success(message, Some(sha))
}
