//! Running fee totals.

use serde::{Deserialize, Serialize};
use shared_types::Amount;

/// Fees consumed by batch submission and fees already paid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTotals {
    /// Spent, not yet released
    pub collected: Amount,
    pub released: Amount,
}

impl FeeTotals {
    /// Totals after `amount` more is collected, or `None` on overflow.
    pub fn collect(self, amount: Amount) -> Option<Self> {
        Some(Self {
            collected: self.collected.checked_add(amount)?,
            ..self
        })
    }

    /// Totals after everything collected is paid out.
    pub fn release(self) -> Self {
        Self {
            collected: 0,
            released: self.released.saturating_add(self.collected),
        }
    }
}
