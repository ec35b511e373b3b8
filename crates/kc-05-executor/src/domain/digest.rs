//! # Execution Digests
//!
//! Keypers sign [`authorization_message`]; the receipt stores
//! [`operations_hash`] so slashing evidence can reference exactly what ran.
//! Every variable-length field is length prefixed.

use kc_04_batcher::Operation;
use shared_crypto::{keccak256, KeccakHasher};
use shared_types::{Address, Hash, SequenceNumber, Step};

/// Domain separator for batch authorizations.
pub const AUTHORIZATION_DOMAIN: &[u8] = b"keyper-chain/execute-batch/v1";

/// Digest over the decrypted operations, in order.
pub fn operations_hash(operations: &[Operation]) -> Hash {
    let mut hasher = KeccakHasher::new();
    hasher.update_u64(operations.len() as u64);
    for op in operations {
        hasher.update_prefixed(op);
    }
    hasher.finalize()
}

/// Message a keyper quorum signs to authorize executing a batch.
pub fn authorization_message(
    sequence: SequenceNumber,
    payload_ref: &Hash,
    operations_hash: &Hash,
) -> Hash {
    let mut hasher = KeccakHasher::new();
    hasher
        .update(AUTHORIZATION_DOMAIN)
        .update_u64(sequence)
        .update(payload_ref)
        .update(operations_hash);
    hasher.finalize()
}

/// Content hash of an execution receipt.
pub fn receipt_hash(
    sequence: SequenceNumber,
    executed_at: Step,
    operations_hash: &Hash,
    authorization: &[u8],
    executor: &Address,
) -> Hash {
    let mut hasher = KeccakHasher::new();
    hasher
        .update_u64(sequence)
        .update_u64(executed_at)
        .update(operations_hash)
        .update(&keccak256(authorization))
        .update(executor);
    hasher.finalize()
}
