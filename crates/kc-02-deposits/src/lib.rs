//! # kc-02-deposits
//!
//! DepositLedger: per-keyper stake backed by an external token ledger.
//!
//! ## Security Model
//!
//! | Entry point | Authorized Caller |
//! |-------------|-------------------|
//! | `deposit` / `withdraw` | the owner |
//! | `lock` / `unlock` | Slasher |
//! | `slash` | Slasher |
//!
//! A withdrawal may not take a keyper below the stake its role bonds
//! ([`StakeRequirement`]).
//!
//! Invariants: every balance is non-negative, and the sum of balances
//! never exceeds what was transferred in.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::Deposit;
pub use error::{DepositError, DepositResult};
pub use ports::{StakeRequirement, Unbonded};
pub use service::DepositLedger;
