//! Chat orchestration

mod coordinator;

pub use coordinator::{ChatCoordinator, HISTORY_REPLAY_LIMIT};
