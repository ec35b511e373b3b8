//! # kc-01-config
//!
//! ConfigStore: versioned governance parameters with a mandatory
//! activation delay.
//!
//! ## Overview
//!
//! - **Who may act**: the active epoch's keyper set and quorum threshold
//! - **What it costs**: the batch fee schedule and payload limit
//! - **Heads-up delay**: a scheduled change is public for `heads_up_delay`
//!   steps before it applies
//!
//! Downstream components (deposits, batcher, executor, slasher, key
//! broadcast) query the store through [`ConfigQuery`] at the step they
//! run in.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{BatchConfig, ConfigEpoch, FeeSchedule};
pub use error::{ConfigError, ConfigResult};
pub use ports::ConfigQuery;
pub use service::ConfigStore;
