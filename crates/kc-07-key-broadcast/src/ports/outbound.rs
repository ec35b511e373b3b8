//! Driven ports
//!
//! Publication is checked against the epoch history served by kc-01 through
//! [`ConfigQuery`]: the epoch must be in effect and the publisher one of its
//! keypers.

pub use kc_01_config::ConfigQuery;
