//! Session registry
//!
//! Tracks all live sessions using DashMap for thread-safe access from
//! concurrently running connection handlers.

use super::Session;
use dashmap::DashMap;
use std::sync::Arc;

/// Registry of all live sessions
///
/// Mutation is confined to `register`/`unregister`; both are safe to call
/// concurrently without losing registrations.
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Session>>,
}

impl SessionRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a session
    pub fn register(&self, session: Arc<Session>) {
        tracing::debug!(session_id = %session.id(), "Session registered");
        self.sessions.insert(session.id().to_string(), session);
    }

    /// Unregister a session, returning it if it was present
    pub fn unregister(&self, session_id: &str) -> Option<Arc<Session>> {
        let removed = self.sessions.remove(session_id).map(|(_, s)| s);
        if removed.is_some() {
            tracing::debug!(session_id = %session_id, "Session unregistered");
        }
        removed
    }

    /// Get a session by ID
    pub fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Check if a session is registered
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Visit every live session
    pub fn for_each(&self, mut f: impl FnMut(&Arc<Session>)) {
        for entry in &self.sessions {
            f(entry.value());
        }
    }

    /// Get the number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_register_unregister() {
        let registry = SessionRegistry::new();
        let (tx, _rx) = mpsc::channel(10);
        let session = Session::new("session1".to_string(), tx);

        registry.register(session);
        assert_eq!(registry.count(), 1);
        assert!(registry.contains("session1"));

        assert!(registry.unregister("session1").is_some());
        assert_eq!(registry.count(), 0);
        assert!(!registry.contains("session1"));
    }

    #[tokio::test]
    async fn test_unregister_unknown_session() {
        let registry = SessionRegistry::new();
        assert!(registry.unregister("missing").is_none());
    }

    #[tokio::test]
    async fn test_for_each_visits_all() {
        let registry = SessionRegistry::new();
        for i in 0..3 {
            let (tx, _rx) = mpsc::channel(10);
            registry.register(Session::new(format!("session{i}"), tx));
        }

        let mut visited = 0;
        registry.for_each(|_| visited += 1);
        assert_eq!(visited, 3);
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        let registry = SessionRegistry::new_shared();
        let mut handles = Vec::new();

        for i in 0..32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::channel(10);
                registry.register(Session::new(format!("session{i}"), tx));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(registry.count(), 32);
    }
}
