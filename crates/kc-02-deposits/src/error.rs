//! Error types for the DepositLedger

use shared_types::{Address, Amount, CapabilityError, CaseId, LedgerError};
use thiserror::Error;

/// DepositLedger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositError {
    /// Caller component lacks the capability for this entry point
    #[error(transparent)]
    Unauthorized(#[from] CapabilityError),

    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Insufficient balance for {owner:?}: have {balance}, requested {requested}")]
    InsufficientBalance {
        owner: Address,
        balance: Amount,
        requested: Amount,
    },

    /// Withdrawals are frozen while open cases reference the owner
    #[error("Deposit of {owner:?} locked by cases {cases:?}")]
    Locked { owner: Address, cases: Vec<CaseId> },

    /// The owner holds a keyper role and would drop below its bonded stake
    #[error("Withdrawing {requested} would leave {owner:?} with {remaining}, below the bonded {bonded}")]
    Bonded {
        owner: Address,
        requested: Amount,
        remaining: Amount,
        bonded: Amount,
    },

    #[error("Balance overflow")]
    BalanceOverflow,

    /// The external token ledger refused the transfer
    #[error("Token transfer failed: {0}")]
    TransferFailed(#[from] LedgerError),
}

/// Result type for DepositLedger operations
pub type DepositResult<T> = Result<T, DepositError>;
