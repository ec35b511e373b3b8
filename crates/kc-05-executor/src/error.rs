//! Error types for the Executor

use kc_01_config::ConfigError;
use kc_04_batcher::BatcherError;
use shared_types::SequenceNumber;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Already executed, or an earlier batch is still unexecuted
    #[error("Stale sequence: expected {expected}, got {got}")]
    StaleSequence {
        expected: SequenceNumber,
        got: SequenceNumber,
    },

    #[error("Unknown batch {sequence}")]
    UnknownBatch { sequence: SequenceNumber },

    #[error("Quorum not met for batch {sequence}")]
    QuorumNotMet { sequence: SequenceNumber },

    /// One operation failed; nothing from the batch was applied
    #[error("Target rejected operation {index} of batch {sequence}: {reason}")]
    TargetExecutionFailed {
        sequence: SequenceNumber,
        index: usize,
        reason: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Batcher(BatcherError),
}

impl From<BatcherError> for ExecutorError {
    fn from(err: BatcherError) -> Self {
        match err {
            BatcherError::StaleSequence { expected, got } => Self::StaleSequence { expected, got },
            BatcherError::UnknownBatch { sequence } => Self::UnknownBatch { sequence },
            other => Self::Batcher(other),
        }
    }
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
