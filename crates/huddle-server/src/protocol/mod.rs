//! Wire protocol
//!
//! Defines the named events exchanged over the WebSocket connection.

mod events;
mod payloads;

pub use events::{ClientEvent, ServerEvent};
pub use payloads::{AddReactionPayload, ErrorPayload, ReactionUpdatePayload, SendMessagePayload};
