//! Fee escrow state and entry points.

use crate::domain::FeeTotals;
use crate::error::{FeeBankError, FeeBankResult};
use crate::ports::TokenLedger;
use serde::{Deserialize, Serialize};
use shared_types::{short_hex, Address, Amount, CapabilityMatrix, ComponentId};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Prepaid fee balances plus fees already consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeEscrow {
    balances: BTreeMap<Address, Amount>,
    totals: FeeTotals,
    #[serde(skip)]
    capabilities: CapabilityMatrix,
}

impl FeeEscrow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit_fee(
        &mut self,
        owner: &Address,
        amount: Amount,
        ledger: &dyn TokenLedger,
    ) -> FeeBankResult<Amount> {
        if amount == 0 {
            return Err(FeeBankError::ZeroAmount);
        }
        let balance = self
            .balance_of(owner)
            .checked_add(amount)
            .ok_or(FeeBankError::BalanceOverflow)?;

        ledger.transfer_in(owner, amount)?;

        self.balances.insert(*owner, balance);
        info!(owner = %short_hex(owner), amount, balance, "[kc-03] Fee deposited");
        Ok(balance)
    }

    pub fn withdraw_fee(
        &mut self,
        owner: &Address,
        amount: Amount,
        ledger: &dyn TokenLedger,
    ) -> FeeBankResult<Amount> {
        if amount == 0 {
            return Err(FeeBankError::ZeroAmount);
        }
        let balance = self.ensure_balance(owner, amount)?;

        ledger.transfer_out(owner, amount)?;

        let remaining = balance - amount;
        self.balances.insert(*owner, remaining);
        info!(owner = %short_hex(owner), amount, remaining, "[kc-03] Fee withdrawn");
        Ok(remaining)
    }

    /// Consume `amount` of `owner`'s prepaid balance. BatchRegistry only.
    pub fn spend_fee(
        &mut self,
        caller: ComponentId,
        owner: &Address,
        amount: Amount,
    ) -> FeeBankResult<Amount> {
        self.capabilities
            .ensure(caller, ComponentId::FeeEscrow, "spend_fee")?;
        let balance = self.ensure_balance(owner, amount)?;
        let totals = self
            .totals
            .collect(amount)
            .ok_or(FeeBankError::BalanceOverflow)?;

        let remaining = balance - amount;
        self.balances.insert(*owner, remaining);
        self.totals = totals;

        debug!(owner = %short_hex(owner), amount, remaining, "[kc-03] Fee spent");
        Ok(remaining)
    }

    /// Pay every collected fee out to `recipient`. Returns the amount paid.
    pub fn release_collected(
        &mut self,
        recipient: &Address,
        ledger: &dyn TokenLedger,
    ) -> FeeBankResult<Amount> {
        let amount = self.totals.collected;
        if amount == 0 {
            return Ok(0);
        }

        ledger.transfer_out(recipient, amount)?;

        self.totals = self.totals.release();
        info!(recipient = %short_hex(recipient), amount, "[kc-03] Collected fees released");
        Ok(amount)
    }

    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn collected(&self) -> Amount {
        self.totals.collected
    }

    pub fn released(&self) -> Amount {
        self.totals.released
    }

    pub fn totals(&self) -> FeeTotals {
        self.totals
    }

    fn ensure_balance(&self, owner: &Address, requested: Amount) -> FeeBankResult<Amount> {
        let balance = self.balance_of(owner);
        if requested > balance {
            return Err(FeeBankError::InsufficientBalance {
                owner: *owner,
                balance,
                requested,
            });
        }
        Ok(balance)
    }
}
