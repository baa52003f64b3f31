//! Named event frames
//!
//! Every WebSocket frame is a JSON object `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use huddle_core::Message;

use super::payloads::{AddReactionPayload, ErrorPayload, ReactionUpdatePayload, SendMessagePayload};

/// Events a client may send to the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Post a new message to the room
    SendMessage(SendMessagePayload),
    /// Toggle an emoji reaction on a message
    AddReaction(AddReactionPayload),
}

impl ClientEvent {
    /// Deserialize from a JSON frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Events the server delivers to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// History replay, unicast to a session right after it connects
    LoadMessages(Vec<Message>),
    /// A message was persisted, broadcast to every session
    NewMessage(Message),
    /// A message's reaction set changed, broadcast to every session
    ReactionUpdated(ReactionUpdatePayload),
    /// Request failed, unicast to the originating session
    Error(ErrorPayload),
}

impl ServerEvent {
    /// Get the wire name of this event
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadMessages(_) => "load-messages",
            Self::NewMessage(_) => "new-message",
            Self::ReactionUpdated(_) => "reaction-updated",
            Self::Error(_) => "error",
        }
    }

    /// Serialize to a JSON frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
