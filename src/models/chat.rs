//! Chat messages.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{id_space_exhausted, require, Record};
use crate::errors::AppError;
use crate::store::Table;

/// Longest message body accepted.
pub const MAX_MESSAGE_LEN: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Sent,
    Received,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Epoch milliseconds at creation, bumped to stay unique
    pub id: u64,
    pub sender_id: u64,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
    #[serde(default)]
    pub direction: Direction,
}

impl ChatMessage {
    pub fn from_request(id: u64, request: SendMessageRequest) -> Self {
        Self {
            id,
            sender_id: request.sender_id,
            content: request.content.trim().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            direction: request.direction.unwrap_or_default(),
        }
    }
}

impl Record for ChatMessage {
    type Id = u64;
    const TABLE: Table = Table::Chat;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let after_last = match existing.iter().map(|m| m.id).max() {
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| id_space_exhausted(Self::TABLE))?,
            None => 0,
        };
        Ok(now.max(after_last))
    }
}

/// Request body for sending a chat message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: u64,
    pub content: String,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Message", &self.content)?;
        if self.content.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::Validation(format!(
                "Message exceeds {} characters",
                MAX_MESSAGE_LEN
            )));
        }
        Ok(())
    }
}
