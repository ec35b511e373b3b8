//! # Genesis
//!
//! Builds the initial [`ProtocolState`] from a [`NodeConfig`]. Genesis
//! keypers are not subject to the minimum-stake check that applies to later
//! configuration changes; there are no deposits yet.

use crate::config::{NodeConfig, NodeConfigError};
use crate::error::ProtocolError;
use crate::state::ProtocolState;
use shared_types::{short_hex, Step};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(#[from] NodeConfigError),

    #[error("Failed to initialize genesis state: {0}")]
    StateInitFailed(#[from] ProtocolError),
}

/// Genesis state with the configured epoch active from `start_step`.
pub fn build_genesis(config: &NodeConfig, start_step: Step) -> Result<ProtocolState, GenesisError> {
    let governance = config.governance()?;
    let batch_config = config.genesis_config()?;
    let settings = config.slasher_settings()?;

    info!(
        governance = %short_hex(&governance),
        resolver = %short_hex(&settings.resolver),
        keypers = batch_config.keypers.len(),
        threshold = batch_config.threshold,
        start_step,
        "Building genesis state"
    );

    let state = ProtocolState::genesis(
        governance,
        config.protocol.heads_up_delay,
        batch_config,
        settings,
        config.min_keyper_stake(),
        start_step,
    )?;
    Ok(state)
}
