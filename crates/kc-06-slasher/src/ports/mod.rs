//! Ports for the Slasher

pub mod outbound;

pub use outbound::{Arbiter, ConfigQuery, ExecutedBatches};
