//! Driven Ports (SPI - Outbound Dependencies)

use kc_04_batcher::Operation;
use shared_types::{Address, Hash, SequenceNumber};
use thiserror::Error;

/// Keyper set and threshold in force at the execution step.
pub use kc_01_config::ConfigQuery;

/// Quorum-signature verification capability.
pub trait QuorumVerifier: Send + Sync {
    /// True when `authorization` carries at least `threshold` distinct
    /// valid approvals of `message` from members of `keypers`.
    fn verify_quorum(
        &self,
        keypers: &[Address],
        threshold: u32,
        message: &Hash,
        authorization: &[u8],
    ) -> bool;
}

/// Failure of one operation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation {index} failed: {reason}")]
pub struct TargetError {
    pub index: usize,
    pub reason: String,
}

/// The external contract that receives decrypted operations.
///
/// `execute` is all-or-nothing: on `Err` no operation of the batch has
/// taken effect.
pub trait BatchTarget: Send + Sync {
    fn execute(&self, sequence: SequenceNumber, operations: &[Operation])
        -> Result<(), TargetError>;
}
