//! Driven ports
//!
//! | Port | Provided by |
//! |------|-------------|
//! | [`ConfigQuery`] | kc-01 ConfigStore, for the fee schedule and payload limit |
//! | [`FeeSpender`] | kc-03 FeeEscrow, charged on every submission |

pub use kc_01_config::ConfigQuery;
pub use kc_03_fee_bank::FeeSpender;
