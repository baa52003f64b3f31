//! Server setup
//!
//! Router, state construction, and the main serve loop.

mod handler;
mod state;

pub use handler::ws_handler;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use huddle_common::{AppConfig, AppError};
use huddle_core::MessageStore;
use huddle_db::PgMessageStore;

use crate::api;
use crate::chat::ChatCoordinator;
use crate::session::SessionRegistry;

/// Create the server router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/messages", get(api::get_messages))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: AppState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        // The frontend is served from elsewhere; allow any origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize all dependencies and create `AppState`
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = huddle_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = huddle_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    // Create store, registry, and coordinator
    let store: Arc<dyn MessageStore> = Arc::new(PgMessageStore::new(pool, 0));
    let registry = SessionRegistry::new_shared();
    let coordinator = Arc::new(ChatCoordinator::new(store, registry));

    Ok(AppState::new(coordinator, config))
}

/// Run the server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Listening on ws://{}/ws", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    // Create application state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
