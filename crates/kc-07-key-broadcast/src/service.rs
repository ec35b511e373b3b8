//! Key publication store.

use crate::domain::KeyMaterial;
use crate::error::{KeyBroadcastError, KeyBroadcastResult};
use crate::ports::ConfigQuery;
use serde::{Deserialize, Serialize};
use shared_types::{short_hex, Address, EpochId, Step};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyBroadcast {
    keys: BTreeMap<EpochId, KeyMaterial>,
}

impl KeyBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` for `epoch_id`. Set at most once per epoch.
    pub fn publish_key(
        &mut self,
        publisher: &Address,
        epoch_id: EpochId,
        key: Vec<u8>,
        configs: &dyn ConfigQuery,
        now: Step,
    ) -> KeyBroadcastResult<&KeyMaterial> {
        let epoch = configs
            .epoch(epoch_id)
            .filter(|epoch| epoch.is_active_at(now))
            .ok_or(KeyBroadcastError::EpochNotActive { epoch_id })?;
        if !epoch.config.is_keyper(publisher) {
            return Err(KeyBroadcastError::Unauthorized {
                publisher: *publisher,
                epoch_id,
            });
        }
        if self.keys.contains_key(&epoch_id) {
            return Err(KeyBroadcastError::AlreadyPublished { epoch_id });
        }
        if key.is_empty() {
            return Err(KeyBroadcastError::EmptyKey);
        }

        info!(
            epoch_id,
            publisher = %short_hex(publisher),
            key_len = key.len(),
            "[kc-07] Epoch key published"
        );
        let material = self.keys.entry(epoch_id).or_insert(KeyMaterial {
            epoch_id,
            publisher: *publisher,
            key,
            published_at: now,
        });
        Ok(material)
    }

    pub fn key_for(&self, epoch_id: EpochId) -> Option<&KeyMaterial> {
        self.keys.get(&epoch_id)
    }

    pub fn published(&self) -> impl Iterator<Item = &KeyMaterial> {
        self.keys.values()
    }
}
