//! Message entity - represents a chat message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Reactions, Snowflake};

/// Message entity
///
/// This single shape is shared by the WebSocket events, the HTTP API, and
/// the persisted record: `{id, text, sender, timestamp, reactions}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub text: String,
    pub sender: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub reactions: Reactions,
}

impl Message {
    /// Create a new Message with no reactions
    pub fn new(id: Snowflake, text: String, sender: String) -> Self {
        Self {
            id,
            text,
            sender,
            created_at: Utc::now(),
            reactions: Reactions::new(),
        }
    }

    /// Check if message text is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if any user has reacted to this message
    #[inline]
    pub fn has_reactions(&self) -> bool {
        !self.reactions.is_empty()
    }
}
