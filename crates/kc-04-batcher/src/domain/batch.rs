//! Batches and their execution receipts.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Hash, SequenceNumber, Step};

/// One decrypted operation, opaque to the protocol.
pub type Operation = Vec<u8>;

/// A submitted encrypted batch. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub sequence: SequenceNumber,
    /// keccak256 of the encrypted payload
    pub payload_ref: Hash,
    pub payload_len: u64,
    pub submitter: Address,
    pub fee_paid: Amount,
    pub submitted_at: Step,
}

/// Receipt of a batch that was executed against the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedBatch {
    pub sequence: SequenceNumber,
    pub executed_at: Step,
    /// Quorum authorization as submitted
    pub authorization: Vec<u8>,
    /// Decrypted operations in the order they were applied
    pub operations: Vec<Operation>,
    pub operations_hash: Hash,
    pub receipt_hash: Hash,
    pub executor: Address,
}
