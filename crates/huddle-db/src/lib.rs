//! # huddle-db
//!
//! Store layer implementing the `MessageStore` trait.
//!
//! ## Overview
//!
//! This crate provides two implementations of the store trait defined in
//! `huddle-core`:
//!
//! - [`PgMessageStore`] - PostgreSQL via SQLx; one row per message with the
//!   reaction map in a JSONB column
//! - [`MemoryMessageStore`] - in-process store for tests and development
//!   without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use huddle_db::pool::{create_pool, DatabaseConfig};
//! use huddle_db::PgMessageStore;
//! use huddle_core::MessageStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let store = PgMessageStore::new(pool, 0);
//!
//!     let message = store.append("hello", "alice").await?;
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod store;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use store::{MemoryMessageStore, PgMessageStore};
