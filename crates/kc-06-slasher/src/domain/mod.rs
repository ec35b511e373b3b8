//! Domain types for the Slasher

pub mod case;
pub mod penalty;

pub use case::{CaseOutcome, CaseState, RaisedCase, SlashingCase};
pub use penalty::SlashPenalty;
