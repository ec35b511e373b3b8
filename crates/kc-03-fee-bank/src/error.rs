//! Error types for the FeeEscrow

use shared_types::{Address, Amount, CapabilityError, LedgerError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeBankError {
    #[error(transparent)]
    Unauthorized(#[from] CapabilityError),

    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Insufficient fee balance for {owner:?}: have {balance}, requested {requested}")]
    InsufficientBalance {
        owner: Address,
        balance: Amount,
        requested: Amount,
    },

    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Token transfer failed: {0}")]
    TransferFailed(#[from] LedgerError),
}

pub type FeeBankResult<T> = Result<T, FeeBankError>;
