//! Published key record.

use serde::{Deserialize, Serialize};
use shared_types::{Address, EpochId, Step};

/// Threshold-decryption key for one configuration epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub epoch_id: EpochId,
    pub publisher: Address,
    pub key: Vec<u8>,
    pub published_at: Step,
}
