//! Ports for the BatchRegistry

pub mod inbound;
pub mod outbound;

pub use inbound::ExecutedBatches;
pub use outbound::{ConfigQuery, FeeSpender};
