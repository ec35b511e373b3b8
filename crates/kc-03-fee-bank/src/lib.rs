//! # kc-03-fee-bank
//!
//! FeeEscrow: prepaid fee balances. Submitters top up with `deposit_fee`;
//! the BatchRegistry consumes them through [`FeeSpender`] (the only caller
//! holding that capability). Spent fees accumulate as `collected` until
//! governance releases them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::FeeTotals;
pub use error::{FeeBankError, FeeBankResult};
pub use ports::FeeSpender;
pub use service::FeeEscrow;
