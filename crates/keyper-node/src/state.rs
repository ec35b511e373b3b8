//! # Protocol State
//!
//! One store per component plus the step clock. The whole value is cloned
//! to stage an operation and swapped in on commit, and it is what snapshots
//! persist.

use kc_01_config::{BatchConfig, ConfigStore};
use kc_02_deposits::DepositLedger;
use kc_03_fee_bank::FeeEscrow;
use kc_04_batcher::BatchRegistry;
use kc_06_slasher::{Slasher, SlasherSettings};
use kc_07_key_broadcast::KeyBroadcast;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Step};

use crate::error::ProtocolResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolState {
    /// Current step. Every operation executes at this step.
    pub step: Step,
    /// Stake each keyper of a newly scheduled configuration must hold.
    pub min_keyper_stake: Amount,
    pub configs: ConfigStore,
    pub deposits: DepositLedger,
    pub fees: FeeEscrow,
    pub batches: BatchRegistry,
    pub slasher: Slasher,
    pub keys: KeyBroadcast,
}

impl ProtocolState {
    /// Fresh state with `genesis` active from `step`.
    pub fn genesis(
        governance: Address,
        heads_up_delay: Step,
        genesis: BatchConfig,
        slasher: SlasherSettings,
        min_keyper_stake: Amount,
        step: Step,
    ) -> ProtocolResult<Self> {
        Ok(Self {
            step,
            min_keyper_stake,
            configs: ConfigStore::genesis(governance, heads_up_delay, genesis, step)?,
            deposits: DepositLedger::new(),
            fees: FeeEscrow::new(),
            batches: BatchRegistry::new(),
            slasher: Slasher::new(slasher),
            keys: KeyBroadcast::new(),
        })
    }
}
