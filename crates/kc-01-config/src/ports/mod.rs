//! Ports module for the ConfigStore

pub mod inbound;

pub use inbound::ConfigQuery;
