//! Ports module for the DepositLedger

pub mod outbound;

pub use outbound::{StakeRequirement, Unbonded};
