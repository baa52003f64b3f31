//! Broadcast hub
//!
//! Fans a single event out to every registered session. `publish` enqueues
//! into all live sessions' outbound channels before returning, and each
//! channel preserves order, so two publishes issued in sequence are observed
//! in that sequence by every continuously-connected session.

use std::sync::Arc;

use crate::protocol::ServerEvent;
use crate::session::SessionRegistry;

/// Fans events out to every session in the registry
#[derive(Clone)]
pub struct BroadcastHub {
    registry: Arc<SessionRegistry>,
}

impl BroadcastHub {
    /// Create a new hub over a registry
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to every session currently in the registry
    ///
    /// Never fails: a session whose channel is full or closed is skipped
    /// (closed sessions are reaped by the transport's disconnect path).
    /// Returns the number of sessions the event was enqueued for.
    pub fn publish(&self, event: &ServerEvent) -> usize {
        let mut sent = 0;
        let mut dropped = 0;

        self.registry.for_each(|session| {
            match session.try_send(event.clone()) {
                Ok(()) => sent += 1,
                Err(e) => {
                    dropped += 1;
                    tracing::warn!(
                        session_id = %session.id(),
                        event = %event.name(),
                        error = %e,
                        "Dropped event for unreachable session"
                    );
                }
            }
        });

        tracing::debug!(
            event = %event.name(),
            sent = sent,
            dropped = dropped,
            "Event broadcast"
        );

        sent
    }
}

impl std::fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("registry", &self.registry)
            .finish()
    }
}
