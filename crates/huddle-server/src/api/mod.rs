//! HTTP API
//!
//! Read-only endpoints for message history.

mod messages;
mod response;

pub use messages::get_messages;
pub use response::{ApiError, ApiResult, ErrorBody, ErrorDetail};
