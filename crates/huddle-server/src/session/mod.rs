//! Session tracking
//!
//! One [`Session`] per live WebSocket connection, owned by the
//! [`SessionRegistry`] from register to unregister.

mod registry;
mod session;

pub use registry::SessionRegistry;
pub use session::Session;
