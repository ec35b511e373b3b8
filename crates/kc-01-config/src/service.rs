//! # ConfigStore
//!
//! Append-only log of configuration epochs. A change scheduled at step `S`
//! becomes active at `S + heads_up_delay`; until then every query at an
//! earlier step keeps returning the previous epoch.
//!
//! ```text
//!  epoch 0            epoch 1 (scheduled at S)
//!  ├────────────────────────┼──────────────────────▶ steps
//!  0                      S+delay
//! ```
//!
//! Only one change may be in flight: scheduling while the latest epoch has
//! not yet activated fails with `ChangePending`.

use crate::domain::{BatchConfig, ConfigEpoch};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use shared_types::{short_hex, Address, EpochId, Step};
use tracing::{debug, info};

/// Versioned governance parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStore {
    governance: Address,
    heads_up_delay: Step,
    /// Ordered by `effective_from`, strictly increasing
    epochs: Vec<ConfigEpoch>,
}

impl ConfigStore {
    /// Bootstrap with a genesis epoch active from `at`.
    pub fn genesis(
        governance: Address,
        heads_up_delay: Step,
        config: BatchConfig,
        at: Step,
    ) -> ConfigResult<Self> {
        if heads_up_delay == 0 {
            return Err(ConfigError::InvalidConfig {
                reason: "heads-up delay must be positive".into(),
            });
        }
        config.validate()?;

        info!(
            governance = %short_hex(&governance),
            heads_up_delay,
            keypers = config.keypers.len(),
            threshold = config.threshold,
            "[kc-01] Genesis configuration recorded"
        );

        Ok(Self {
            governance,
            heads_up_delay,
            epochs: vec![ConfigEpoch {
                index: 0,
                scheduled_at: at,
                effective_from: at,
                heads_up_delay,
                config,
            }],
        })
    }

    /// Schedule `config` to take effect `heads_up_delay` steps after `now`.
    pub fn schedule_change(
        &mut self,
        caller: &Address,
        config: BatchConfig,
        now: Step,
    ) -> ConfigResult<&ConfigEpoch> {
        if *caller != self.governance {
            return Err(ConfigError::Unauthorized { caller: *caller });
        }
        if let Some(pending) = self.pending_change(now) {
            return Err(ConfigError::ChangePending {
                effective_from: pending.effective_from,
            });
        }
        config.validate()?;

        let effective_from =
            now.checked_add(self.heads_up_delay)
                .ok_or_else(|| ConfigError::InvalidConfig {
                    reason: "activation step overflows".into(),
                })?;
        let index = self.epochs.len() as EpochId;

        self.epochs.push(ConfigEpoch {
            index,
            scheduled_at: now,
            effective_from,
            heads_up_delay: self.heads_up_delay,
            config,
        });

        info!(
            epoch = index,
            scheduled_at = now,
            effective_from,
            "[kc-01] Configuration change scheduled"
        );

        Ok(&self.epochs[self.epochs.len() - 1])
    }

    /// Latest epoch whose activation step is `<= step`.
    pub fn active_config(&self, step: Step) -> ConfigResult<&ConfigEpoch> {
        let epoch = self
            .epochs
            .iter()
            .rev()
            .find(|epoch| epoch.is_active_at(step))
            .ok_or(ConfigError::NoActiveConfig { step })?;

        debug!(step, epoch = epoch.index, "[kc-01] Resolved active configuration");
        Ok(epoch)
    }

    /// The scheduled epoch that has not activated by `now`, if any.
    pub fn pending_change(&self, now: Step) -> Option<&ConfigEpoch> {
        self.epochs.last().filter(|epoch| !epoch.is_active_at(now))
    }

    pub fn epoch(&self, index: EpochId) -> Option<&ConfigEpoch> {
        usize::try_from(index).ok().and_then(|i| self.epochs.get(i))
    }

    pub fn epochs(&self) -> &[ConfigEpoch] {
        &self.epochs
    }

    pub fn governance(&self) -> &Address {
        &self.governance
    }

    pub fn heads_up_delay(&self) -> Step {
        self.heads_up_delay
    }
}
