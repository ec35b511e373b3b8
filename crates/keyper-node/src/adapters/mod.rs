//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports the components declare:
//!
//! | Port | Adapter |
//! |------|---------|
//! | `shared_types::TokenLedger` | [`InMemoryTokenLedger`] |
//! | `kc_05_executor::BatchTarget` | [`InMemoryTarget`] |
//! | `kc_05_executor::QuorumVerifier` | `kc_05_executor::EcdsaQuorumVerifier` |
//! | `kc_06_slasher::Arbiter` | [`GovernanceArbiter`] |
//! | `kc_02_deposits::StakeRequirement` | [`KeyperBond`] |
//!
//! `KeyperBond` is built per call from the staged state. The others keep
//! their state in memory behind `parking_lot` locks, so they can be shared
//! with the runtime as `Arc<dyn ..>`. The ledger and the arbiter export
//! their contents for [`crate::snapshot::save_adapters`].

pub mod arbiter;
pub mod bond;
pub mod ledger;
pub mod target;

pub use arbiter::GovernanceArbiter;
pub use bond::KeyperBond;
pub use ledger::{InMemoryTokenLedger, LedgerBalances};
pub use target::InMemoryTarget;
