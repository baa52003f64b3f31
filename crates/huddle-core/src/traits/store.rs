//! Message store trait (port) - the interface the durable backend implements
//!
//! The domain layer defines what it needs from persistence; the
//! infrastructure layer provides the implementation. Every operation may
//! suspend waiting on the backing store and can fail independently of
//! in-memory state.

use async_trait::async_trait;

use crate::entities::Message;
use crate::error::DomainError;
use crate::value_objects::{Reactions, Snowflake};

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

/// Durable persistence of messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Create a message with empty reactions and the current timestamp,
    /// persist it, and return it with its assigned identity
    async fn append(&self, text: &str, sender: &str) -> StoreResult<Message>;

    /// Up to `limit` most-recent messages, ordered oldest first
    /// (ascending timestamp, ties broken by insertion order)
    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<Message>>;

    /// Find a message by its identity
    async fn find_by_id(&self, id: Snowflake) -> StoreResult<Option<Message>>;

    /// Atomically overwrite the reactions of an existing message; text,
    /// sender, and timestamp are untouched
    ///
    /// Returns `DomainError::MessageNotFound` if no such message exists.
    async fn replace_reactions(&self, id: Snowflake, reactions: &Reactions) -> StoreResult<()>;
}
