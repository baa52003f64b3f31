//! Message database model
//!
//! Schema (one row per message):
//!
//! ```sql
//! CREATE TABLE messages (
//!     id         BIGINT PRIMARY KEY,
//!     text       TEXT NOT NULL,
//!     sender     TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     reactions  JSONB NOT NULL DEFAULT '{}'
//! );
//! ```

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use huddle_core::{Message, Reactions, Snowflake};

/// Database model for the messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub text: String,
    pub sender: String,
    pub created_at: DateTime<Utc>,
    pub reactions: Json<Reactions>,
}

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            text: model.text,
            sender: model.sender,
            created_at: model.created_at,
            reactions: model.reactions.0,
        }
    }
}
