//! Event payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use huddle_core::{Reactions, Snowflake};

/// Payload of the inbound `send-message` event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessagePayload {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,

    #[validate(length(min = 1, max = 64, message = "sender must be 1-64 characters"))]
    pub sender: String,
}

/// Payload of the inbound `add-reaction` event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReactionPayload {
    pub message_id: Snowflake,
    pub emoji: String,
    pub username: String,
}

/// Payload of the outbound `reaction-updated` event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionUpdatePayload {
    pub message_id: Snowflake,
    pub reactions: Reactions,
}

/// Payload of the outbound `error` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ErrorPayload {
    /// Create a new error payload
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&huddle_core::DomainError> for ErrorPayload {
    fn from(err: &huddle_core::DomainError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}
