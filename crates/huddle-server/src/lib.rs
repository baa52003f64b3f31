//! # huddle-server
//!
//! Real-time group chat server. Clients connect over a WebSocket, exchange
//! text messages, and toggle emoji reactions; every connected client sees
//! updates immediately.
//!
//! Layout mirrors the event flow: inbound frames are decoded by [`protocol`],
//! orchestrated by the [`chat`] coordinator against the message store, and
//! fanned out to the [`session`] registry through the [`broadcast`] hub.

pub mod api;
pub mod broadcast;
pub mod chat;
pub mod protocol;
pub mod server;
pub mod session;

pub use server::{create_app, create_app_state, run, run_server, AppState};
