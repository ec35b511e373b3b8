//! Slash amount policy.

use serde::{Deserialize, Serialize};
use shared_types::Amount;

/// How much stake an upheld case forfeits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlashPenalty {
    /// The accused's entire balance.
    #[default]
    FullStake,
    /// A fixed amount, capped at the balance.
    Fixed(Amount),
}

impl SlashPenalty {
    pub fn amount_for(&self, balance: Amount) -> Amount {
        match self {
            Self::FullStake => balance,
            Self::Fixed(amount) => (*amount).min(balance),
        }
    }
}
