//! Keyper stake bond, derived from the configurations in force.
//!
//! An identity in the active keyper set, or in a scheduled set that has not
//! activated yet, must keep `min_keyper_stake` deposited. Leaving both sets
//! (by a later configuration change) releases the bond.

use kc_01_config::ConfigQuery;
use kc_02_deposits::StakeRequirement;
use shared_types::{Address, Amount, Step};

pub struct KeyperBond<'a> {
    configs: &'a dyn ConfigQuery,
    now: Step,
    minimum: Amount,
}

impl<'a> KeyperBond<'a> {
    pub fn new(configs: &'a dyn ConfigQuery, now: Step, minimum: Amount) -> Self {
        Self {
            configs,
            now,
            minimum,
        }
    }
}

impl StakeRequirement for KeyperBond<'_> {
    fn required_stake(&self, owner: &Address) -> Amount {
        if self.configs.is_bonded(owner, self.now) {
            self.minimum
        } else {
            0
        }
    }
}
