//! Error types for the BatchRegistry

use kc_01_config::ConfigError;
use kc_03_fee_bank::FeeBankError;
use shared_types::{Amount, SequenceNumber};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatcherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fee(#[from] FeeBankError),

    #[error("Batch payload is empty")]
    EmptyPayload,

    #[error("Batch payload of {len} bytes exceeds limit of {max}")]
    PayloadTooLarge { len: u64, max: u64 },

    #[error("Fee {offered} below required {required}")]
    FeeTooLow { offered: Amount, required: Amount },

    #[error("Unknown batch {sequence}")]
    UnknownBatch { sequence: SequenceNumber },

    /// Execution out of order or repeated
    #[error("Stale sequence: expected {expected}, got {got}")]
    StaleSequence {
        expected: SequenceNumber,
        got: SequenceNumber,
    },
}

pub type BatcherResult<T> = Result<T, BatcherError>;
