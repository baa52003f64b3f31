//! Store traits (ports) - define the interface for durable persistence

mod store;

pub use store::{MessageStore, StoreResult};
