//! Message handlers
//!
//! Endpoints for message history.

use axum::{extract::State, Json};

use huddle_core::Message;

use crate::api::response::ApiResult;
use crate::server::AppState;

/// Get the most recent messages, oldest first
///
/// GET /api/messages
pub async fn get_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    let messages = state.coordinator().recent_messages().await?;
    Ok(Json(messages))
}
