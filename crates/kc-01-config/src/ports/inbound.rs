//! Driving port: read access to configuration epochs.
//!
//! Every downstream component resolves keypers, thresholds and fees through
//! this trait at the step it runs in, never through the store's internals.

use crate::domain::ConfigEpoch;
use crate::error::ConfigResult;
use crate::service::ConfigStore;
use shared_types::{Address, EpochId, Step};

pub trait ConfigQuery: Send + Sync {
    /// Latest epoch whose activation step is `<= step`.
    fn active_config(&self, step: Step) -> ConfigResult<&ConfigEpoch>;

    /// The scheduled epoch that has not activated by `now`, if any.
    fn pending_change(&self, now: Step) -> Option<&ConfigEpoch>;

    fn epoch(&self, index: EpochId) -> Option<&ConfigEpoch>;

    /// Whether `identity` sits in the active keyper set at `now` or in the
    /// set about to replace it. Such an identity must stay staked.
    fn is_bonded(&self, identity: &Address, now: Step) -> bool {
        let active = self
            .active_config(now)
            .is_ok_and(|epoch| epoch.config.is_keyper(identity));
        let incoming = self
            .pending_change(now)
            .is_some_and(|epoch| epoch.config.is_keyper(identity));
        active || incoming
    }
}

impl ConfigQuery for ConfigStore {
    fn active_config(&self, step: Step) -> ConfigResult<&ConfigEpoch> {
        ConfigStore::active_config(self, step)
    }

    fn pending_change(&self, now: Step) -> Option<&ConfigEpoch> {
        ConfigStore::pending_change(self, now)
    }

    fn epoch(&self, index: EpochId) -> Option<&ConfigEpoch> {
        ConfigStore::epoch(self, index)
    }
}
