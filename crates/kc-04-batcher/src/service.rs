//! # BatchRegistry
//!
//! Sequence numbers are assigned from 0 with no gaps; receipts are
//! recorded in the same order, so `executed.len()` is always the next
//! sequence the executor may run.

use crate::domain::{Batch, ExecutedBatch};
use crate::error::{BatcherError, BatcherResult};
use crate::ports::{ConfigQuery, FeeSpender};
use serde::{Deserialize, Serialize};
use shared_crypto::keccak256;
use shared_types::{short_hex, Address, Amount, ComponentId, SequenceNumber, Step};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRegistry {
    batches: Vec<Batch>,
    executed: Vec<ExecutedBatch>,
}

impl BatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fee-paid batch under the next sequence number.
    ///
    /// The fee is consumed from the submitter's escrow balance and must
    /// cover the active fee schedule for the payload size.
    pub fn submit_batch(
        &mut self,
        submitter: &Address,
        payload: &[u8],
        fee: Amount,
        configs: &dyn ConfigQuery,
        escrow: &mut dyn FeeSpender,
        now: Step,
    ) -> BatcherResult<&Batch> {
        let epoch = configs.active_config(now)?;
        let payload_len = payload.len() as u64;

        if payload.is_empty() {
            return Err(BatcherError::EmptyPayload);
        }
        let max = epoch.config.max_payload_bytes;
        if payload_len > max {
            return Err(BatcherError::PayloadTooLarge {
                len: payload_len,
                max,
            });
        }
        let required = epoch.config.fee_schedule.minimum_fee(payload_len);
        if fee < required {
            return Err(BatcherError::FeeTooLow {
                offered: fee,
                required,
            });
        }

        escrow.spend_fee(ComponentId::BatchRegistry, submitter, fee)?;

        let sequence = self.next_sequence();
        let batch = Batch {
            sequence,
            payload_ref: keccak256(payload),
            payload_len,
            submitter: *submitter,
            fee_paid: fee,
            submitted_at: now,
        };
        info!(
            sequence,
            payload_ref = %short_hex(&batch.payload_ref),
            submitter = %short_hex(submitter),
            fee,
            "[kc-04] Batch submitted"
        );
        self.batches.push(batch);

        Ok(&self.batches[self.batches.len() - 1])
    }

    /// The batch that must be executed next, if `sequence` is it.
    pub fn ensure_executable(&self, sequence: SequenceNumber) -> BatcherResult<&Batch> {
        let expected = self.next_to_execute();
        if sequence != expected {
            return Err(BatcherError::StaleSequence {
                expected,
                got: sequence,
            });
        }
        self.batch(sequence)
            .ok_or(BatcherError::UnknownBatch { sequence })
    }

    /// Append an execution receipt. Only the next unexecuted batch accepts one.
    pub fn record_execution(&mut self, receipt: ExecutedBatch) -> BatcherResult<()> {
        self.ensure_executable(receipt.sequence)?;
        self.executed.push(receipt);
        Ok(())
    }

    pub fn batch(&self, sequence: SequenceNumber) -> Option<&Batch> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.batches.get(i))
    }

    pub fn executed(&self, sequence: SequenceNumber) -> Option<&ExecutedBatch> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.executed.get(i))
    }

    pub fn next_sequence(&self) -> SequenceNumber {
        self.batches.len() as SequenceNumber
    }

    pub fn next_to_execute(&self) -> SequenceNumber {
        self.executed.len() as SequenceNumber
    }

    pub fn last_executed(&self) -> Option<SequenceNumber> {
        self.next_to_execute().checked_sub(1)
    }
}
