//! # Node Configuration
//!
//! Unified configuration for the protocol parameters, the genesis epoch and
//! runtime concerns.
//!
//! ## Sources
//!
//! 1. Defaults (heads-up delay 30, appeal window 10, three keypers)
//! 2. A TOML file
//! 3. `KC_*` environment overrides
//!
//! ```toml
//! [protocol]
//! heads_up_delay = 30
//! appeal_window = 10
//! min_keyper_stake = 1000
//! slash_penalty = 0          # 0 forfeits the full stake
//! slash_recipient = "0x0000000000000000000000000000000000000000"
//!
//! [genesis]
//! governance = "0x..."
//! resolver = "0x..."
//! keypers = ["0x...", "0x...", "0x..."]
//! threshold = 2
//! base_fee = 10
//! fee_per_byte = 1
//! max_payload_bytes = 65536
//!
//! [storage]
//! snapshot_path = "./data/keyper-chain.snapshot"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Amounts are `u64` here because TOML integers are 64-bit; the protocol
//! widens them to `Amount`.

use kc_01_config::{BatchConfig, FeeSchedule};
use kc_06_slasher::{SlashPenalty, SlasherSettings};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Step, BURN_ADDRESS};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum NodeConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub protocol: ProtocolConfig,
    pub genesis: GenesisConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub node: RuntimeConfig,
}

/// Fixed protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Steps between scheduling a configuration and its activation.
    pub heads_up_delay: Step,
    /// Steps an accused keyper has to appeal.
    pub appeal_window: Step,
    /// Stake every keyper of a newly scheduled configuration must hold.
    pub min_keyper_stake: u64,
    /// Fixed slash amount; 0 forfeits the full stake.
    pub slash_penalty: u64,
    /// Receives slashed stake.
    pub slash_recipient: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            heads_up_delay: 30,
            appeal_window: 10,
            min_keyper_stake: 1_000,
            slash_penalty: 0,
            slash_recipient: format_address(&BURN_ADDRESS),
        }
    }
}

/// Genesis epoch and privileged identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    pub governance: String,
    /// Identity allowed to record arbitration verdicts.
    pub resolver: String,
    pub keypers: Vec<String>,
    pub threshold: u32,
    pub base_fee: u64,
    pub fee_per_byte: u64,
    pub max_payload_bytes: u64,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            governance: format_address(&[0xA0; 20]),
            resolver: format_address(&[0xA1; 20]),
            keypers: (1..=3u8).map(|i| format_address(&[i; 20])).collect(),
            threshold: 2,
            base_fee: 10,
            fee_per_byte: 1,
            max_payload_bytes: 64 * 1024,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where the protocol state is persisted on shutdown and restored from.
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./data/keyper-chain.snapshot"),
        }
    }
}

/// Logging configuration. `RUST_LOG` takes precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Binary-only settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Milliseconds between step advances of the local clock.
    pub step_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: 1_000,
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NodeConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| NodeConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys keep defaults.
    pub fn parse(content: &str) -> Result<Self, NodeConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `KC_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparseable values are logged and
    /// ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "KC_HEADS_UP_DELAY", &mut self.protocol.heads_up_delay);
        override_parsed(&lookup, "KC_APPEAL_WINDOW", &mut self.protocol.appeal_window);
        override_parsed(&lookup, "KC_MIN_KEYPER_STAKE", &mut self.protocol.min_keyper_stake);
        override_parsed(&lookup, "KC_STEP_INTERVAL_MS", &mut self.node.step_interval_ms);
        if let Some(governance) = lookup("KC_GOVERNANCE") {
            self.genesis.governance = governance;
        }
        if let Some(resolver) = lookup("KC_RESOLVER") {
            self.genesis.resolver = resolver;
        }
        if let Some(keypers) = lookup("KC_KEYPERS") {
            self.genesis.keypers = keypers
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
        if let Some(path) = lookup("KC_SNAPSHOT_PATH") {
            self.storage.snapshot_path = PathBuf::from(path);
        }
        if let Some(level) = lookup("KC_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Reject parameters the protocol cannot start with.
    pub fn validate(&self) -> Result<(), NodeConfigError> {
        if self.protocol.heads_up_delay == 0 {
            return Err(NodeConfigError::Invalid(
                "heads_up_delay must be positive".into(),
            ));
        }
        if self.protocol.appeal_window == 0 {
            return Err(NodeConfigError::Invalid(
                "appeal_window must be positive".into(),
            ));
        }
        if self.node.step_interval_ms == 0 {
            return Err(NodeConfigError::Invalid(
                "step_interval_ms must be positive".into(),
            ));
        }
        self.governance()?;
        self.resolver()?;
        self.slash_recipient()?;
        self.genesis_config()?
            .validate()
            .map_err(|e| NodeConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    pub fn governance(&self) -> Result<Address, NodeConfigError> {
        parse_address(&self.genesis.governance)
    }

    pub fn resolver(&self) -> Result<Address, NodeConfigError> {
        parse_address(&self.genesis.resolver)
    }

    pub fn slash_recipient(&self) -> Result<Address, NodeConfigError> {
        parse_address(&self.protocol.slash_recipient)
    }

    pub fn min_keyper_stake(&self) -> Amount {
        Amount::from(self.protocol.min_keyper_stake)
    }

    /// The genesis epoch's batch configuration.
    pub fn genesis_config(&self) -> Result<BatchConfig, NodeConfigError> {
        let keypers = self
            .genesis
            .keypers
            .iter()
            .map(|k| parse_address(k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BatchConfig {
            keypers,
            threshold: self.genesis.threshold,
            fee_schedule: FeeSchedule {
                base_fee: Amount::from(self.genesis.base_fee),
                fee_per_byte: Amount::from(self.genesis.fee_per_byte),
            },
            max_payload_bytes: self.genesis.max_payload_bytes,
        })
    }

    pub fn slasher_settings(&self) -> Result<SlasherSettings, NodeConfigError> {
        let penalty = match self.protocol.slash_penalty {
            0 => SlashPenalty::FullStake,
            amount => SlashPenalty::Fixed(Amount::from(amount)),
        };
        Ok(SlasherSettings {
            appeal_window: self.protocol.appeal_window,
            resolver: self.resolver()?,
            penalty,
            recipient: self.slash_recipient()?,
        })
    }

    /// Log the effective configuration at startup.
    pub fn log_summary(&self) {
        info!(
            heads_up_delay = self.protocol.heads_up_delay,
            appeal_window = self.protocol.appeal_window,
            min_keyper_stake = self.protocol.min_keyper_stake,
            keypers = self.genesis.keypers.len(),
            threshold = self.genesis.threshold,
            snapshot = %self.storage.snapshot_path.display(),
            "Node configuration loaded"
        );
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparseable override"),
        }
    }
}

/// Parse a `0x`-prefixed (or bare) 40-character hex address.
pub fn parse_address(value: &str) -> Result<Address, NodeConfigError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(digits).map_err(|e| NodeConfigError::InvalidAddress {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    Address::try_from(bytes.as_slice()).map_err(|_| NodeConfigError::InvalidAddress {
        value: value.to_string(),
        reason: format!("expected 20 bytes, got {}", bytes.len()),
    })
}

fn format_address(address: &Address) -> String {
    shared_types::address_hex(address)
}
