//! # Keyper Node Library
//!
//! The runtime that turns the seven component stores into one serialized,
//! atomic state machine. The main entry point is the `main.rs` binary.
//!
//! ```text
//! ┌──────────────────────────── KeyperChain ────────────────────────────┐
//! │  ConfigStore  DepositLedger  FeeEscrow  BatchRegistry               │
//! │  Slasher      KeyBroadcast   (Executor runs over the registry)      │
//! └───────┬───────────────────────────────┬─────────────────────────────┘
//!         │ ports                          │ committed events
//!         ▼                                ▼
//!  TokenLedger, BatchTarget,         InMemoryEventBus
//!  QuorumVerifier, Arbiter
//! ```

pub mod adapters;
pub mod chain;
pub mod config;
pub mod error;
pub mod genesis;
pub mod snapshot;
pub mod state;

pub use chain::{Collaborators, KeyperChain};
pub use config::{NodeConfig, NodeConfigError};
pub use error::{ErrorKind, ProtocolError, ProtocolResult};
pub use genesis::{build_genesis, GenesisError};
pub use snapshot::{
    adapters_path, load_adapters, load_snapshot, save_adapters, save_snapshot, AdapterSnapshot,
    SnapshotError,
};
pub use state::ProtocolState;
