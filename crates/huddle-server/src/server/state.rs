//! Server state
//!
//! Application state shared across all handlers.

use std::sync::Arc;

use huddle_common::AppConfig;

use crate::chat::ChatCoordinator;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Chat coordinator holding the store, registry, and hub
    coordinator: Arc<ChatCoordinator>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(coordinator: Arc<ChatCoordinator>, config: AppConfig) -> Self {
        Self {
            coordinator,
            config: Arc::new(config),
        }
    }

    /// Get the chat coordinator
    pub fn coordinator(&self) -> &Arc<ChatCoordinator> {
        &self.coordinator
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("coordinator", &self.coordinator)
            .field("config", &"AppConfig")
            .finish()
    }
}
