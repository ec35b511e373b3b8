//! # Token Ledger Port
//!
//! The external token ledger backing stake deposits and fee escrow. Only
//! transfer-in/transfer-out semantics are assumed; everything else about the
//! token is out of scope.

use crate::entities::{Address, Amount};
use crate::errors::LedgerError;

/// External token ledger.
///
/// Both calls are all-or-nothing: on `Err` no funds moved.
pub trait TokenLedger: Send + Sync {
    /// Pull `amount` from `from` into the protocol's custody.
    fn transfer_in(&self, from: &Address, amount: Amount) -> Result<(), LedgerError>;

    /// Push `amount` out of the protocol's custody to `to`.
    fn transfer_out(&self, to: &Address, amount: Amount) -> Result<(), LedgerError>;
}
