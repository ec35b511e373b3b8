//! # Configuration Epochs
//!
//! A [`BatchConfig`] is the parameter set keypers operate under; a
//! [`ConfigEpoch`] pins one to the step it takes effect. Epochs are immutable
//! once recorded.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, EpochId, Step};
use std::collections::HashSet;

/// Fee owed for submitting a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Flat fee per batch
    pub base_fee: Amount,
    /// Additional fee per payload byte
    pub fee_per_byte: Amount,
}

impl FeeSchedule {
    /// Minimum fee for a payload of `payload_len` bytes.
    pub fn minimum_fee(&self, payload_len: u64) -> Amount {
        self.fee_per_byte
            .saturating_mul(Amount::from(payload_len))
            .saturating_add(self.base_fee)
    }
}

/// Keyper set, quorum and batch limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub keypers: Vec<Address>,
    /// Distinct keyper authorizations needed to execute a batch
    pub threshold: u32,
    pub fee_schedule: FeeSchedule,
    pub max_payload_bytes: u64,
}

impl BatchConfig {
    /// Rejects empty or duplicated keyper sets and unreachable thresholds.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.keypers.is_empty() {
            return Err(invalid("keyper set is empty"));
        }
        let unique: HashSet<&Address> = self.keypers.iter().collect();
        if unique.len() != self.keypers.len() {
            return Err(invalid("keyper set contains duplicates"));
        }
        if self.threshold == 0 || self.threshold as usize > self.keypers.len() {
            return Err(invalid(&format!(
                "threshold {} outside 1..={}",
                self.threshold,
                self.keypers.len()
            )));
        }
        if self.max_payload_bytes == 0 {
            return Err(invalid("max_payload_bytes must be positive"));
        }
        Ok(())
    }

    pub fn is_keyper(&self, identity: &Address) -> bool {
        self.keypers.contains(identity)
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::InvalidConfig {
        reason: reason.to_string(),
    }
}

/// A configuration pinned to its activation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEpoch {
    /// Position in the epoch log; genesis is 0
    pub index: EpochId,
    pub scheduled_at: Step,
    pub effective_from: Step,
    /// Delay that applied when this epoch was scheduled
    pub heads_up_delay: Step,
    pub config: BatchConfig,
}

impl ConfigEpoch {
    pub fn is_active_at(&self, step: Step) -> bool {
        self.effective_from <= step
    }
}
