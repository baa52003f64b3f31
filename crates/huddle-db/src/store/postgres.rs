//! PostgreSQL implementation of MessageStore

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use huddle_core::{Message, MessageStore, Reactions, Snowflake, SnowflakeGenerator, StoreResult};

use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

/// PostgreSQL implementation of MessageStore
///
/// Message identity is assigned here at append time, so ordering by id is
/// ordering by insertion.
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
    ids: Arc<SnowflakeGenerator>,
}

impl PgMessageStore {
    /// Create a new PgMessageStore
    pub fn new(pool: PgPool, worker_id: u16) -> Self {
        Self {
            pool,
            ids: Arc::new(SnowflakeGenerator::new(worker_id)),
        }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    #[instrument(skip(self, text))]
    async fn append(&self, text: &str, sender: &str) -> StoreResult<Message> {
        let message = Message {
            id: self.ids.generate(),
            text: text.to_string(),
            sender: sender.to_string(),
            created_at: Utc::now(),
            reactions: Reactions::new(),
        };

        sqlx::query(
            r#"
            INSERT INTO messages (id, text, sender, created_at, reactions)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(&message.text)
        .bind(&message.sender)
        .bind(message.created_at)
        .bind(Json(&message.reactions))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(message)
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<Message>> {
        let mut models = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, text, sender, created_at, reactions
            FROM messages
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // Query returns newest first; callers expect oldest first
        models.reverse();

        Ok(models.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> StoreResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, text, sender, created_at, reactions
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, reactions))]
    async fn replace_reactions(&self, id: Snowflake, reactions: &Reactions) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET reactions = $2
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(Json(reactions))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageStore>();
    }
}
