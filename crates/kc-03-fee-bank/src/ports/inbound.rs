//! Driving port used by the BatchRegistry to charge submission fees.

use crate::error::FeeBankResult;
use crate::service::FeeEscrow;
use shared_types::{Address, Amount, ComponentId};

/// Consumes prepaid fee balances.
pub trait FeeSpender {
    /// Take `amount` from `owner`'s balance on behalf of `caller`. Returns
    /// what remains.
    fn spend_fee(
        &mut self,
        caller: ComponentId,
        owner: &Address,
        amount: Amount,
    ) -> FeeBankResult<Amount>;
}

impl FeeSpender for FeeEscrow {
    fn spend_fee(
        &mut self,
        caller: ComponentId,
        owner: &Address,
        amount: Amount,
    ) -> FeeBankResult<Amount> {
        FeeEscrow::spend_fee(self, caller, owner, amount)
    }
}
