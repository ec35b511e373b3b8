//! Error types for the ConfigStore

use shared_types::{Address, Step};
use thiserror::Error;

/// ConfigStore errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Caller is not the governance identity
    #[error("Unauthorized: {caller:?} is not governance")]
    Unauthorized { caller: Address },

    /// A scheduled change has not activated yet
    #[error("Configuration change pending until step {effective_from}")]
    ChangePending { effective_from: Step },

    /// Nothing is active at the queried step
    #[error("No active configuration at step {step}")]
    NoActiveConfig { step: Step },

    /// Rejected parameters
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type for ConfigStore operations
pub type ConfigResult<T> = Result<T, ConfigError>;
