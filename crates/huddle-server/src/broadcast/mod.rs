//! Event broadcast

mod hub;

pub use hub::BroadcastHub;
