//! Ports for the KeyBroadcast

pub mod outbound;

pub use outbound::ConfigQuery;
