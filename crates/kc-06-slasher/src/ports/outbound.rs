//! Driven Ports (SPI - Outbound Dependencies)
//!
//! | Port | Provided by |
//! |------|-------------|
//! | [`Arbiter`] | the runtime (governance decisions) |
//! | [`ExecutedBatches`] | kc-04 BatchRegistry |
//! | [`ConfigQuery`] | kc-01 ConfigStore |

use crate::domain::SlashingCase;
use shared_types::{Hash, Verdict};

pub use kc_01_config::ConfigQuery;
pub use kc_04_batcher::ExecutedBatches;

/// Arbitration decision capability for appealed cases.
///
/// The decision policy is external; the Slasher only records and applies
/// the outcome.
pub trait Arbiter: Send + Sync {
    fn arbitrate(&self, case: &SlashingCase, counter_evidence: &Hash) -> Verdict;
}
