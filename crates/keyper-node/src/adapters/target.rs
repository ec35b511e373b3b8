//! In-memory batch target.
//!
//! Applies a batch atomically: every operation is checked against the
//! rejection list before any of them is recorded.

use kc_04_batcher::Operation;
use kc_05_executor::{BatchTarget, TargetError};
use parking_lot::Mutex;
use shared_types::SequenceNumber;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryTarget {
    applied: Mutex<Vec<(SequenceNumber, Operation)>>,
    rejected: Mutex<HashSet<Operation>>,
}

impl InMemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call containing `operation` fail.
    pub fn reject_operation(&self, operation: Operation) {
        self.rejected.lock().insert(operation);
    }

    /// Operations applied so far, in order.
    pub fn applied(&self) -> Vec<(SequenceNumber, Operation)> {
        self.applied.lock().clone()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.lock().len()
    }
}

impl BatchTarget for InMemoryTarget {
    fn execute(
        &self,
        sequence: SequenceNumber,
        operations: &[Operation],
    ) -> Result<(), TargetError> {
        {
            let rejected = self.rejected.lock();
            if let Some(index) = operations.iter().position(|op| rejected.contains(op)) {
                return Err(TargetError {
                    index,
                    reason: "operation rejected by target".into(),
                });
            }
        }

        let mut applied = self.applied.lock();
        applied.extend(operations.iter().map(|op| (sequence, op.clone())));
        debug!(sequence, operations = operations.len(), "Target applied batch");
        Ok(())
    }
}
