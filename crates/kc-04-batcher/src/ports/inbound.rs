//! Read access to execution receipts, used by the Slasher to find the
//! authorization a case accuses.

use crate::domain::ExecutedBatch;
use crate::service::BatchRegistry;
use shared_types::SequenceNumber;

pub trait ExecutedBatches {
    fn executed(&self, sequence: SequenceNumber) -> Option<&ExecutedBatch>;
}

impl ExecutedBatches for BatchRegistry {
    fn executed(&self, sequence: SequenceNumber) -> Option<&ExecutedBatch> {
        BatchRegistry::executed(self, sequence)
    }
}
