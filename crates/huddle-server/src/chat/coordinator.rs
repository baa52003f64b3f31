//! Chat coordinator
//!
//! Orchestrates the store, the session registry, and the broadcast hub in
//! response to inbound events. Error policy is asymmetric on purpose:
//! send-message failures are reported back to the originating session as an
//! `error` event, while reaction-path failures are logged and absorbed so a
//! single failed toggle never disrupts the shared stream.

use std::sync::Arc;

use tracing::{error, info, instrument, trace, warn};
use validator::Validate;

use huddle_core::{DomainError, Message, MessageStore, Reactions, StoreResult};

use crate::broadcast::BroadcastHub;
use crate::protocol::{
    AddReactionPayload, ErrorPayload, ReactionUpdatePayload, SendMessagePayload, ServerEvent,
};
use crate::session::{Session, SessionRegistry};

/// Number of messages replayed to a newly connected session
pub const HISTORY_REPLAY_LIMIT: i64 = 100;

/// Orchestrates inbound events against the store, registry, and hub
pub struct ChatCoordinator {
    store: Arc<dyn MessageStore>,
    registry: Arc<SessionRegistry>,
    hub: BroadcastHub,
}

impl ChatCoordinator {
    /// Create a new coordinator
    pub fn new(store: Arc<dyn MessageStore>, registry: Arc<SessionRegistry>) -> Self {
        let hub = BroadcastHub::new(registry.clone());
        Self {
            store,
            registry,
            hub,
        }
    }

    /// Get the session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Register a session and replay recent history to it
    ///
    /// Only the new session receives the `load-messages` event. If loading
    /// history fails, the session starts with no history; nothing is sent.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub async fn handle_connect(&self, session: Arc<Session>) {
        self.registry.register(session.clone());
        info!(sessions = self.registry.count(), "Session connected");

        match self.store.list_recent(HISTORY_REPLAY_LIMIT).await {
            Ok(messages) => {
                session.send(ServerEvent::LoadMessages(messages)).await.ok();
            }
            Err(e) => {
                error!(error = %e, "Failed to load history for new session");
            }
        }
    }

    /// Persist a message and broadcast it to every session
    ///
    /// On failure the originating session receives a unicast `error` event.
    #[instrument(skip(self, session, payload), fields(session_id = %session.id()))]
    pub async fn handle_send_message(&self, session: &Session, payload: SendMessagePayload) {
        if let Err(e) = self.send_message(session, payload).await {
            warn!(error = %e, "Failed to send message");
            session
                .send(ServerEvent::Error(ErrorPayload::from(&e)))
                .await
                .ok();
        }
    }

    async fn send_message(
        &self,
        session: &Session,
        payload: SendMessagePayload,
    ) -> Result<(), DomainError> {
        payload
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        if payload.text.trim().is_empty() {
            return Err(DomainError::validation("text must not be empty"));
        }

        // First message names the session
        if session.name().await.is_none() {
            session.set_name(&payload.sender).await;
        }

        let message = self.store.append(&payload.text, &payload.sender).await?;

        info!(
            message_id = %message.id,
            sender = %message.sender,
            "Message created"
        );

        self.hub.publish(&ServerEvent::NewMessage(message));

        Ok(())
    }

    /// Toggle a reaction and broadcast the message's new reaction set
    ///
    /// Best-effort: an unknown message id is a silent no-op, and store
    /// failures are logged without surfacing anything to any client.
    #[instrument(skip(self, payload), fields(message_id = %payload.message_id))]
    pub async fn handle_toggle_reaction(&self, payload: AddReactionPayload) {
        match self.toggle_reaction(&payload).await {
            Ok(Some(reactions)) => {
                self.hub
                    .publish(&ServerEvent::ReactionUpdated(ReactionUpdatePayload {
                        message_id: payload.message_id,
                        reactions,
                    }));
            }
            Ok(None) => {
                trace!("Reaction toggle for unknown message ignored");
            }
            Err(e) => {
                warn!(emoji = %payload.emoji, error = %e, "Reaction toggle failed");
            }
        }
    }

    async fn toggle_reaction(&self, payload: &AddReactionPayload) -> StoreResult<Option<Reactions>> {
        let Some(mut message) = self.store.find_by_id(payload.message_id).await? else {
            return Ok(None);
        };

        message.reactions.toggle(&payload.emoji, &payload.username);
        debug_assert!(message.reactions.is_consistent());

        // find -> toggle -> replace is not atomic: two concurrent toggles on
        // the same message can race and one update can be lost
        self.store
            .replace_reactions(message.id, &message.reactions)
            .await?;

        Ok(Some(message.reactions))
    }

    /// Unregister a session
    #[instrument(skip(self))]
    pub async fn handle_disconnect(&self, session_id: &str) {
        if self.registry.unregister(session_id).is_some() {
            info!(sessions = self.registry.count(), "Session disconnected");
        }
    }

    /// The most recent messages, oldest first
    pub async fn recent_messages(&self) -> StoreResult<Vec<Message>> {
        self.store.list_recent(HISTORY_REPLAY_LIMIT).await
    }
}

impl std::fmt::Debug for ChatCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCoordinator")
            .field("registry", &self.registry)
            .finish()
    }
}
