//! Domain types for the DepositLedger

pub mod deposit;

pub use deposit::Deposit;
