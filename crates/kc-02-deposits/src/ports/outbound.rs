//! Driven ports
//!
//! | Port | Provided by |
//! |------|-------------|
//! | [`TokenLedger`] | the external token contract |
//! | [`StakeRequirement`] | the runtime, from the keyper sets in force |

use shared_types::{Address, Amount};

pub use shared_types::{LedgerError, TokenLedger};

/// Stake an owner must keep deposited while it holds a keyper role.
///
/// Withdrawals that would take the balance below this amount are refused.
pub trait StakeRequirement {
    fn required_stake(&self, owner: &Address) -> Amount;
}

/// No owner is bonded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbonded;

impl StakeRequirement for Unbonded {
    fn required_stake(&self, _owner: &Address) -> Amount {
        0
    }
}
