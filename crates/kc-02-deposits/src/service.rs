//! # DepositLedger
//!
//! Stake balances backed by the external token ledger. Three entry points
//! move balances:
//!
//! | Entry point | Effect | Caller |
//! |-------------|--------|--------|
//! | `deposit` | increase | owner |
//! | `withdraw` | decrease, refused while locked or below the keyper bond | owner |
//! | `slash` | decrease, forwarded to a recipient | Slasher only |
//!
//! Every entry point validates first, then makes its single external
//! transfer, then applies an infallible update, so a failure at any point
//! leaves the ledger untouched.

use crate::domain::Deposit;
use crate::error::{DepositError, DepositResult};
use crate::ports::StakeRequirement;
use serde::{Deserialize, Serialize};
use shared_types::{
    short_hex, Address, Amount, CapabilityMatrix, CaseId, ComponentId, TokenLedger,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Keyper stake accounting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositLedger {
    deposits: BTreeMap<Address, Deposit>,
    total_inflow: Amount,
    total_withdrawn: Amount,
    total_slashed: Amount,
    #[serde(skip)]
    capabilities: CapabilityMatrix,
}

impl DepositLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull `amount` from `owner` and credit it. Returns the new balance.
    pub fn deposit(
        &mut self,
        owner: &Address,
        amount: Amount,
        ledger: &dyn TokenLedger,
    ) -> DepositResult<Amount> {
        if amount == 0 {
            return Err(DepositError::ZeroAmount);
        }
        let current = self.balance_of(owner);
        let balance = current
            .checked_add(amount)
            .ok_or(DepositError::BalanceOverflow)?;
        let total_inflow = self
            .total_inflow
            .checked_add(amount)
            .ok_or(DepositError::BalanceOverflow)?;

        ledger.transfer_in(owner, amount)?;

        self.deposits
            .entry(*owner)
            .or_insert_with(|| Deposit::new(*owner))
            .balance = balance;
        self.total_inflow = total_inflow;

        info!(owner = %short_hex(owner), amount, balance, "[kc-02] Stake deposited");
        Ok(balance)
    }

    /// Return `amount` to `owner`. Returns the remaining balance.
    ///
    /// The remaining balance must cover what `requirement` bonds for
    /// `owner`.
    pub fn withdraw(
        &mut self,
        owner: &Address,
        amount: Amount,
        requirement: &dyn StakeRequirement,
        ledger: &dyn TokenLedger,
    ) -> DepositResult<Amount> {
        if amount == 0 {
            return Err(DepositError::ZeroAmount);
        }
        if let Some(deposit) = self.deposits.get(owner).filter(|d| d.is_locked()) {
            return Err(DepositError::Locked {
                owner: *owner,
                cases: deposit.locked_by.iter().copied().collect(),
            });
        }
        let balance = self.balance_of(owner);
        if amount > balance {
            return Err(DepositError::InsufficientBalance {
                owner: *owner,
                balance,
                requested: amount,
            });
        }
        let remaining = balance - amount;
        let bonded = requirement.required_stake(owner);
        if remaining < bonded {
            return Err(DepositError::Bonded {
                owner: *owner,
                requested: amount,
                remaining,
                bonded,
            });
        }

        ledger.transfer_out(owner, amount)?;

        if let Some(deposit) = self.deposits.get_mut(owner) {
            deposit.balance = remaining;
        }
        self.total_withdrawn += amount;

        info!(owner = %short_hex(owner), amount, remaining, "[kc-02] Stake withdrawn");
        Ok(remaining)
    }

    /// Freeze withdrawals for `owner` while `case_id` is open.
    pub fn lock(
        &mut self,
        caller: ComponentId,
        owner: &Address,
        case_id: CaseId,
    ) -> DepositResult<()> {
        self.capabilities
            .ensure(caller, ComponentId::DepositLedger, "lock")?;

        self.deposits
            .entry(*owner)
            .or_insert_with(|| Deposit::new(*owner))
            .locked_by
            .insert(case_id);

        debug!(owner = %short_hex(owner), case_id, "[kc-02] Deposit locked");
        Ok(())
    }

    /// Release the lock held by `case_id`. Other cases keep theirs.
    pub fn unlock(
        &mut self,
        caller: ComponentId,
        owner: &Address,
        case_id: CaseId,
    ) -> DepositResult<()> {
        self.capabilities
            .ensure(caller, ComponentId::DepositLedger, "unlock")?;

        if let Some(deposit) = self.deposits.get_mut(owner) {
            deposit.locked_by.remove(&case_id);
        }

        debug!(owner = %short_hex(owner), case_id, "[kc-02] Deposit lock released");
        Ok(())
    }

    /// Forfeit `amount` of `owner`'s stake to `recipient`. Returns the
    /// remaining balance. Slashing zero is a no-op.
    pub fn slash(
        &mut self,
        caller: ComponentId,
        owner: &Address,
        amount: Amount,
        recipient: &Address,
        ledger: &dyn TokenLedger,
    ) -> DepositResult<Amount> {
        self.capabilities
            .ensure(caller, ComponentId::DepositLedger, "slash")?;

        let balance = self.balance_of(owner);
        if amount > balance {
            return Err(DepositError::InsufficientBalance {
                owner: *owner,
                balance,
                requested: amount,
            });
        }
        if amount == 0 {
            return Ok(balance);
        }

        ledger.transfer_out(recipient, amount)?;

        let remaining = balance - amount;
        if let Some(deposit) = self.deposits.get_mut(owner) {
            deposit.balance = remaining;
        }
        self.total_slashed += amount;

        info!(
            owner = %short_hex(owner),
            amount,
            recipient = %short_hex(recipient),
            remaining,
            "[kc-02] Stake slashed"
        );
        Ok(remaining)
    }

    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.deposits.get(owner).map_or(0, |d| d.balance)
    }

    pub fn is_locked(&self, owner: &Address) -> bool {
        self.deposits.get(owner).is_some_and(Deposit::is_locked)
    }

    pub fn deposit_of(&self, owner: &Address) -> Option<&Deposit> {
        self.deposits.get(owner)
    }

    pub fn total_balance(&self) -> Amount {
        self.deposits.values().map(|d| d.balance).sum()
    }

    pub fn total_inflow(&self) -> Amount {
        self.total_inflow
    }

    pub fn total_slashed(&self) -> Amount {
        self.total_slashed
    }

    /// Every token that came in is either still held, withdrawn or slashed.
    pub fn check_invariants(&self) -> bool {
        let held = self.total_balance();
        held <= self.total_inflow
            && held + self.total_withdrawn + self.total_slashed == self.total_inflow
    }
}
