//! Individual client session
//!
//! Represents a single live connection and its ephemeral identity. Never
//! persisted; destroyed on disconnect.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};

use crate::protocol::ServerEvent;

/// A single live client session
pub struct Session {
    /// Unique session ID
    id: String,

    /// Chosen display name (None until the first message is sent)
    name: RwLock<Option<String>>,

    /// Channel to the connection's outbound writer task
    sender: mpsc::Sender<ServerEvent>,

    /// Session creation time
    connected_at: Instant,
}

impl Session {
    /// Create a new session
    pub fn new(id: String, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: RwLock::new(None),
            sender,
            connected_at: Instant::now(),
        })
    }

    /// Generate a new session ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Get the session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the chosen display name (if any)
    pub async fn name(&self) -> Option<String> {
        self.name.read().await.clone()
    }

    /// Record the chosen display name
    pub async fn set_name(&self, name: &str) {
        *self.name.write().await = Some(name.to_string());
    }

    /// Get session age
    pub fn age(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }

    /// Send an event to this session, waiting for buffer space
    pub async fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event).await
    }

    /// Try to send an event without blocking
    pub fn try_send(&self, event: ServerEvent) -> Result<(), mpsc::error::TrySendError<ServerEvent>> {
        self.sender.try_send(event)
    }

    /// Check if the outbound channel is closed (connection gone)
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("connected_at", &self.connected_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_creation() {
        let (tx, _rx) = mpsc::channel(10);
        let session = Session::new("session123".to_string(), tx);

        assert_eq!(session.id(), "session123");
        assert!(session.name().await.is_none());
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn test_session_name() {
        let (tx, _rx) = mpsc::channel(10);
        let session = Session::new("session123".to_string(), tx);

        session.set_name("alice").await;
        assert_eq!(session.name().await, Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_session_send() {
        let (tx, mut rx) = mpsc::channel(10);
        let session = Session::new("session123".to_string(), tx);

        session
            .send(ServerEvent::LoadMessages(Vec::new()))
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(ServerEvent::LoadMessages(_))
        ));
    }

    #[tokio::test]
    async fn test_session_closed_after_receiver_drop() {
        let (tx, rx) = mpsc::channel(10);
        let session = Session::new("session123".to_string(), tx);

        drop(rx);
        assert!(session.is_closed());
        assert!(session.try_send(ServerEvent::LoadMessages(Vec::new())).is_err());
    }

    #[test]
    fn test_generate_session_id() {
        let id1 = Session::generate_id();
        let id2 = Session::generate_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36); // UUID format
    }
}
