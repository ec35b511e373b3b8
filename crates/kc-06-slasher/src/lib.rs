//! # kc-06-slasher
//!
//! Slasher: ties misbehavior evidence to an executed batch and a keyper's
//! stake, runs the appeal window, and triggers forfeiture.
//!
//! ## Security Model
//!
//! | Operation | Authorized Caller | Timing |
//! |-----------|-------------------|--------|
//! | `raise_case` | anyone | batch executed, accused was a keyper |
//! | `appeal` | the accused | `step < appeal_deadline` |
//! | `resolve_appeal` | configured resolver | case appealed |
//! | `finalize` | anyone | `step >= appeal_deadline` |
//!
//! Only the Slasher holds the capability to lock, unlock and slash
//! deposits, and it exercises `slash` solely from `finalize`.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{CaseOutcome, CaseState, RaisedCase, SlashPenalty, SlashingCase};
pub use error::{SlasherError, SlasherResult};
pub use ports::Arbiter;
pub use service::{Slasher, SlasherSettings};
