//! # Error Types
//!
//! Errors shared by more than one component.

use crate::entities::{Address, Amount};
use crate::security::ComponentId;
use thiserror::Error;

/// Failures reported by the external token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The payer cannot cover the transfer.
    #[error("Insufficient funds: {account:?} holds {available}, transfer needs {required}")]
    InsufficientFunds {
        account: Address,
        available: Amount,
        required: Amount,
    },

    /// The ledger refused the transfer for its own reasons.
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// A component invoked a privileged entry point it holds no capability for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unauthorized: {caller} may not call {recipient}::{operation}")]
pub struct CapabilityError {
    pub caller: ComponentId,
    pub recipient: ComponentId,
    pub operation: &'static str,
}
