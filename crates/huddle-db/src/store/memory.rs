//! In-memory implementation of MessageStore
//!
//! Backs tests and database-less development. Messages live in insertion
//! order in a Vec guarded by an async RwLock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use huddle_core::{Message, MessageStore, Reactions, Snowflake, SnowflakeGenerator, StoreResult};

use super::error::message_not_found;

/// In-memory implementation of MessageStore
#[derive(Clone, Default)]
pub struct MemoryMessageStore {
    messages: Arc<RwLock<Vec<Message>>>,
    ids: Arc<SnowflakeGenerator>,
}

impl MemoryMessageStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Check if the store holds no messages
    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, text: &str, sender: &str) -> StoreResult<Message> {
        let message = Message {
            id: self.ids.generate(),
            text: text.to_string(),
            sender: sender.to_string(),
            created_at: Utc::now(),
            reactions: Reactions::new(),
        };

        self.messages.write().await.push(message.clone());

        Ok(message)
    }

    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let limit = usize::try_from(limit.max(0)).unwrap_or(0);
        let start = messages.len().saturating_sub(limit);

        Ok(messages[start..].to_vec())
    }

    async fn find_by_id(&self, id: Snowflake) -> StoreResult<Option<Message>> {
        let messages = self.messages.read().await;

        Ok(messages.iter().find(|m| m.id == id).cloned())
    }

    async fn replace_reactions(&self, id: Snowflake, reactions: &Reactions) -> StoreResult<()> {
        let mut messages = self.messages.write().await;

        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| message_not_found(id))?;

        message.reactions = reactions.clone();

        Ok(())
    }
}
