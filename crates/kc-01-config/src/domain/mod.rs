//! Domain types for the ConfigStore

pub mod epoch;

pub use epoch::{BatchConfig, ConfigEpoch, FeeSchedule};
