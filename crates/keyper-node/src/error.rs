//! # Protocol Errors
//!
//! Every entry point of [`crate::KeyperChain`] fails with exactly one
//! [`ProtocolError`]. Component errors pass through unchanged; the runtime
//! adds the conditions that span components. [`ProtocolError::kind`]
//! collapses all of them into the categorical [`ErrorKind`] taxonomy.

use kc_01_config::ConfigError;
use kc_02_deposits::DepositError;
use kc_03_fee_bank::FeeBankError;
use kc_04_batcher::BatcherError;
use kc_05_executor::ExecutorError;
use kc_06_slasher::SlasherError;
use kc_07_key_broadcast::KeyBroadcastError;
use shared_types::{address_hex, Address, Amount, Step};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deposit(#[from] DepositError),

    #[error(transparent)]
    FeeBank(#[from] FeeBankError),

    #[error(transparent)]
    Batcher(#[from] BatcherError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Slasher(#[from] SlasherError),

    #[error(transparent)]
    KeyBroadcast(#[from] KeyBroadcastError),

    /// The step clock only moves forward.
    #[error("Step regression: current step {current}, requested {requested}")]
    StepRegression { current: Step, requested: Step },

    /// Caller is not governance.
    #[error("Unauthorized caller {}", address_hex(.caller))]
    Unauthorized { caller: Address },

    /// A keyper of a scheduled configuration does not hold enough stake.
    #[error("Keyper {} holds {balance}, requires {required}", address_hex(.keyper))]
    InsufficientStake {
        keyper: Address,
        balance: Amount,
        required: Amount,
    },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Categorical failure conditions, independent of the component that
/// raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    InsufficientBalance,
    InsufficientStake,
    Locked,
    StaleSequence,
    QuorumNotMet,
    TargetExecutionFailed,
    NotYetExpired,
    AlreadyResolved,
    AlreadyPublished,
    DuplicateCase,
    /// Unknown batch, case or epoch
    NotFound,
    /// Malformed arguments: zero amounts, empty payloads, bad configs
    InvalidInput,
    /// The target record is not in a state that accepts the operation
    InvalidState,
    /// The external token ledger refused a transfer
    TransferFailed,
    StepRegression,
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(e) => config_kind(e),
            Self::Deposit(e) => deposit_kind(e),
            Self::FeeBank(e) => fee_bank_kind(e),
            Self::Batcher(e) => batcher_kind(e),
            Self::Executor(e) => match e {
                ExecutorError::StaleSequence { .. } => ErrorKind::StaleSequence,
                ExecutorError::UnknownBatch { .. } => ErrorKind::NotFound,
                ExecutorError::QuorumNotMet { .. } => ErrorKind::QuorumNotMet,
                ExecutorError::TargetExecutionFailed { .. } => ErrorKind::TargetExecutionFailed,
                ExecutorError::Config(e) => config_kind(e),
                ExecutorError::Batcher(e) => batcher_kind(e),
            },
            Self::Slasher(e) => match e {
                SlasherError::Unauthorized { .. } => ErrorKind::Unauthorized,
                SlasherError::UnknownCase { .. } | SlasherError::UnknownBatch { .. } => {
                    ErrorKind::NotFound
                }
                SlasherError::NotAKeyper { .. } => ErrorKind::InvalidInput,
                SlasherError::DuplicateCase { .. } => ErrorKind::DuplicateCase,
                SlasherError::AlreadyResolved { .. } => ErrorKind::AlreadyResolved,
                SlasherError::NotYetExpired { .. } => ErrorKind::NotYetExpired,
                SlasherError::AlreadyAppealed { .. }
                | SlasherError::AppealWindowClosed { .. }
                | SlasherError::NotAppealed { .. }
                | SlasherError::VerdictAlreadyRecorded { .. }
                | SlasherError::ArbitrationPending { .. } => ErrorKind::InvalidState,
                SlasherError::Config(e) => config_kind(e),
                SlasherError::Deposit(e) => deposit_kind(e),
            },
            Self::KeyBroadcast(e) => match e {
                KeyBroadcastError::Unauthorized { .. } => ErrorKind::Unauthorized,
                KeyBroadcastError::AlreadyPublished { .. } => ErrorKind::AlreadyPublished,
                KeyBroadcastError::EpochNotActive { .. } => ErrorKind::NotFound,
                KeyBroadcastError::EmptyKey => ErrorKind::InvalidInput,
            },
            Self::StepRegression { .. } => ErrorKind::StepRegression,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InsufficientStake { .. } => ErrorKind::InsufficientStake,
        }
    }
}

fn config_kind(e: &ConfigError) -> ErrorKind {
    match e {
        ConfigError::Unauthorized { .. } => ErrorKind::Unauthorized,
        ConfigError::ChangePending { .. } => ErrorKind::InvalidState,
        ConfigError::NoActiveConfig { .. } => ErrorKind::NotFound,
        ConfigError::InvalidConfig { .. } => ErrorKind::InvalidInput,
    }
}

fn deposit_kind(e: &DepositError) -> ErrorKind {
    match e {
        DepositError::Unauthorized(_) => ErrorKind::Unauthorized,
        DepositError::ZeroAmount | DepositError::BalanceOverflow => ErrorKind::InvalidInput,
        DepositError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
        DepositError::Locked { .. } => ErrorKind::Locked,
        DepositError::Bonded { .. } => ErrorKind::InsufficientStake,
        DepositError::TransferFailed(_) => ErrorKind::TransferFailed,
    }
}

fn fee_bank_kind(e: &FeeBankError) -> ErrorKind {
    match e {
        FeeBankError::Unauthorized(_) => ErrorKind::Unauthorized,
        FeeBankError::ZeroAmount | FeeBankError::BalanceOverflow => ErrorKind::InvalidInput,
        FeeBankError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
        FeeBankError::TransferFailed(_) => ErrorKind::TransferFailed,
    }
}

fn batcher_kind(e: &BatcherError) -> ErrorKind {
    match e {
        BatcherError::Config(e) => config_kind(e),
        BatcherError::Fee(e) => fee_bank_kind(e),
        BatcherError::EmptyPayload | BatcherError::PayloadTooLarge { .. } => {
            ErrorKind::InvalidInput
        }
        BatcherError::FeeTooLow { .. } => ErrorKind::InsufficientBalance,
        BatcherError::UnknownBatch { .. } => ErrorKind::NotFound,
        BatcherError::StaleSequence { .. } => ErrorKind::StaleSequence,
    }
}
