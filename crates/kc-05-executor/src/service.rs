//! # Executor Service
//!
//! Executes batches exactly once and in sequence order:
//!
//! 1. `sequence` must be the next unexecuted batch (`StaleSequence`)
//! 2. the authorization must satisfy the quorum of the configuration
//!    active at the execution step (`QuorumNotMet`)
//! 3. the target applies every operation or none (`TargetExecutionFailed`)
//! 4. the receipt is appended to the registry
//!
//! The target call is the only external effect and comes after every
//! check that can fail.

use crate::domain::{authorization_message, operations_hash, receipt_hash};
use crate::error::{ExecutorError, ExecutorResult};
use crate::ports::outbound::{BatchTarget, ConfigQuery, QuorumVerifier};
use kc_04_batcher::{BatchRegistry, ExecutedBatch, Operation};
use shared_types::{short_hex, Address, SequenceNumber, Step};
use tracing::{info, warn};

/// Executor bound to its collaborators for one call site.
pub struct Executor<'a> {
    verifier: &'a dyn QuorumVerifier,
    target: &'a dyn BatchTarget,
}

impl<'a> Executor<'a> {
    pub fn new(verifier: &'a dyn QuorumVerifier, target: &'a dyn BatchTarget) -> Self {
        Self { verifier, target }
    }

    /// Execute batch `sequence` with its decrypted `operations`.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_batch(
        &self,
        registry: &mut BatchRegistry,
        configs: &dyn ConfigQuery,
        sequence: SequenceNumber,
        operations: Vec<Operation>,
        authorization: Vec<u8>,
        executor: &Address,
        now: Step,
    ) -> ExecutorResult<ExecutedBatch> {
        let batch = registry.ensure_executable(sequence)?;
        let epoch = configs.active_config(now)?;

        let ops_hash = operations_hash(&operations);
        let message = authorization_message(sequence, &batch.payload_ref, &ops_hash);

        if !self.verifier.verify_quorum(
            &epoch.config.keypers,
            epoch.config.threshold,
            &message,
            &authorization,
        ) {
            warn!(sequence, epoch = epoch.index, "[kc-05] Batch authorization below quorum");
            return Err(ExecutorError::QuorumNotMet { sequence });
        }

        self.target
            .execute(sequence, &operations)
            .map_err(|e| ExecutorError::TargetExecutionFailed {
                sequence,
                index: e.index,
                reason: e.reason,
            })?;

        let receipt = ExecutedBatch {
            sequence,
            executed_at: now,
            receipt_hash: receipt_hash(sequence, now, &ops_hash, &authorization, executor),
            authorization,
            operations,
            operations_hash: ops_hash,
            executor: *executor,
        };
        registry.record_execution(receipt.clone())?;

        info!(
            sequence,
            operations = receipt.operations.len(),
            receipt = %short_hex(&receipt.receipt_hash),
            "[kc-05] Batch executed"
        );
        Ok(receipt)
    }
}
