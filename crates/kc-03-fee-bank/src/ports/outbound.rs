//! Driven ports
//!
//! Fee deposits, withdrawals and releases move tokens through the external
//! [`TokenLedger`]. Spending a fee moves nothing.

pub use shared_types::{LedgerError, TokenLedger};
