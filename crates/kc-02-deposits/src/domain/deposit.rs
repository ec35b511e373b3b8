//! Per-keyper stake record.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, CaseId};
use std::collections::BTreeSet;

/// Stake held for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub owner: Address,
    pub balance: Amount,
    /// Non-terminal slashing cases referencing this owner
    pub locked_by: BTreeSet<CaseId>,
}

impl Deposit {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            balance: 0,
            locked_by: BTreeSet::new(),
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.locked_by.is_empty()
    }
}
