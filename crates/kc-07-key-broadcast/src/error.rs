//! Error types for KeyBroadcast

use shared_types::{Address, EpochId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyBroadcastError {
    #[error("{publisher:?} is not a keyper of epoch {epoch_id}")]
    Unauthorized {
        publisher: Address,
        epoch_id: EpochId,
    },

    #[error("Key for epoch {epoch_id} already published")]
    AlreadyPublished { epoch_id: EpochId },

    /// Unknown epoch, or scheduled but not yet effective
    #[error("Epoch {epoch_id} is not active")]
    EpochNotActive { epoch_id: EpochId },

    #[error("Key material is empty")]
    EmptyKey,
}

pub type KeyBroadcastResult<T> = Result<T, KeyBroadcastError>;
