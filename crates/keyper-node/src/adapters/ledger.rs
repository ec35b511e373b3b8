//! In-memory token ledger.
//!
//! Wallet balances live outside the protocol; `transfer_in` moves funds from
//! a wallet into protocol custody and `transfer_out` moves them back.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::{short_hex, Address, Amount, LedgerError, TokenLedger};
use std::collections::HashMap;
use tracing::debug;

/// Wallets and custody, as persisted next to the state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBalances {
    pub wallets: HashMap<Address, Amount>,
    pub custody: Amount,
}

#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    inner: Mutex<LedgerBalances>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_balances(balances: LedgerBalances) -> Self {
        Self {
            inner: Mutex::new(balances),
        }
    }

    pub fn balances(&self) -> LedgerBalances {
        self.inner.lock().clone()
    }

    /// Credit `amount` to `account`'s wallet out of thin air.
    pub fn mint(&self, account: &Address, amount: Amount) {
        let mut inner = self.inner.lock();
        let wallet = inner.wallets.entry(*account).or_insert(0);
        *wallet = wallet.saturating_add(amount);
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.inner.lock().wallets.get(account).copied().unwrap_or(0)
    }

    /// Funds currently held by the protocol.
    pub fn custody(&self) -> Amount {
        self.inner.lock().custody
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn transfer_in(&self, from: &Address, amount: Amount) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock();
        let available = inner.wallets.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                available,
                required: amount,
            });
        }
        let custody = inner
            .custody
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Rejected("custody overflow".into()))?;

        inner.wallets.insert(*from, available - amount);
        inner.custody = custody;
        debug!(from = %short_hex(from), amount, "Ledger transfer in");
        Ok(())
    }

    fn transfer_out(&self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock();
        if inner.custody < amount {
            return Err(LedgerError::Rejected(format!(
                "custody holds {}, transfer needs {amount}",
                inner.custody
            )));
        }
        inner.custody -= amount;
        let wallet = inner.wallets.entry(*to).or_insert(0);
        *wallet = wallet.saturating_add(amount);
        debug!(to = %short_hex(to), amount, "Ledger transfer out");
        Ok(())
    }
}
