//! # Shared Types Crate
//!
//! Primitives and cross-component contracts for Keyper-Chain.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, amounts and step counts are
//!   defined once here and reused by every component crate.
//! - **Capabilities, not locks**: privileged entry points (`slash`,
//!   `spend_fee`, deposit locking) check the calling component against the
//!   [`CapabilityMatrix`] instead of relying on mutual exclusion.
//! - **Arena-style references**: components refer to each other's records by
//!   identifier (`SequenceNumber`, `CaseId`, `EpochId`), never by pointer.

pub mod entities;
pub mod errors;
pub mod ledger;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use ledger::TokenLedger;
pub use security::{CapabilityMatrix, ComponentId};
