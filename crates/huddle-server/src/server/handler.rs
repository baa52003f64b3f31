//! WebSocket handler
//!
//! Handles WebSocket connections and frame processing.

use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::chat::ChatCoordinator;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::server::AppState;
use crate::session::Session;

/// Channel buffer size for outgoing events
const EVENT_BUFFER_SIZE: usize = 100;

/// WebSocket upgrade handler
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: AppState, socket: axum::extract::ws::WebSocket) {
    let session_id = Session::generate_id();

    // Create event channel for outgoing events
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(EVENT_BUFFER_SIZE);
    let session = Session::new(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    // Register and replay history before processing any inbound frames
    state.coordinator().handle_connect(session.clone()).await;

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Clone for receive task
    let coordinator_recv = state.coordinator().clone();
    let session_recv = session.clone();

    // Spawn task to receive frames from the WebSocket
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_frame(&coordinator_recv, &session_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_recv.id(),
                        "Binary frames not supported, ignoring"
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Liveness is the websocket layer's concern
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_recv.id(), "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            }
        }
    });

    // Clone for send task
    let session_id_send = session_id.clone();

    // Spawn task to send events to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send event to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_send,
                        error = %e,
                        "Failed to serialize event"
                    );
                }
            }
        }

        // Close the WebSocket when channel is closed
        let _ = ws_sink.close().await;
    });

    // Wait for either direction to finish
    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
    }

    state.coordinator().handle_disconnect(&session_id).await;
}

/// Handle a text frame from the client
///
/// Malformed or unknown frames are logged and ignored; the connection stays
/// up so one client bug cannot disrupt the shared stream.
async fn handle_text_frame(coordinator: &Arc<ChatCoordinator>, session: &Arc<Session>, text: &str) {
    let event = match ClientEvent::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                session_id = %session.id(),
                error = %e,
                "Ignoring malformed frame"
            );
            return;
        }
    };

    match event {
        ClientEvent::SendMessage(payload) => {
            coordinator.handle_send_message(session, payload).await;
        }
        ClientEvent::AddReaction(payload) => {
            coordinator.handle_toggle_reaction(payload).await;
        }
    }
}
