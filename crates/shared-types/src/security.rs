//! # Component Capabilities
//!
//! Privileged entry points are single-writer: only one named component may
//! invoke them. This module is the authorization matrix for those calls.
//!
//! | Recipient | Operation | Authorized Caller |
//! |-----------|-----------|-------------------|
//! | DepositLedger | `slash` | Slasher |
//! | DepositLedger | `lock` | Slasher |
//! | DepositLedger | `unlock` | Slasher |
//! | FeeEscrow | `spend_fee` | BatchRegistry |

use crate::errors::CapabilityError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Protocol components, numbered in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ComponentId {
    ConfigStore = 1,
    DepositLedger = 2,
    FeeEscrow = 3,
    BatchRegistry = 4,
    Executor = 5,
    Slasher = 6,
    KeyBroadcast = 7,
}

impl ComponentId {
    /// Stable name used in events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigStore => "config",
            Self::DepositLedger => "deposits",
            Self::FeeEscrow => "fee-bank",
            Self::BatchRegistry => "batcher",
            Self::Executor => "executor",
            Self::Slasher => "slasher",
            Self::KeyBroadcast => "key-broadcast",
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which component may call which privileged operation on which recipient.
#[derive(Debug, Clone)]
pub struct CapabilityMatrix {
    rules: HashSet<(ComponentId, ComponentId, &'static str)>,
}

impl CapabilityMatrix {
    /// The fixed protocol rules.
    pub fn new() -> Self {
        let mut rules = HashSet::new();

        // DepositLedger: stake forfeiture and withdrawal locks
        rules.insert((ComponentId::Slasher, ComponentId::DepositLedger, "slash"));
        rules.insert((ComponentId::Slasher, ComponentId::DepositLedger, "lock"));
        rules.insert((ComponentId::Slasher, ComponentId::DepositLedger, "unlock"));

        // FeeEscrow: fee consumption on batch submission
        rules.insert((ComponentId::BatchRegistry, ComponentId::FeeEscrow, "spend_fee"));

        Self { rules }
    }

    /// Checks whether `caller` may invoke `operation` on `recipient`.
    pub fn is_authorized(
        &self,
        caller: ComponentId,
        recipient: ComponentId,
        operation: &str,
    ) -> bool {
        self.rules
            .iter()
            .any(|(c, r, op)| *c == caller && *r == recipient && *op == operation)
    }

    /// Like [`Self::is_authorized`] but returns a typed error.
    pub fn ensure(
        &self,
        caller: ComponentId,
        recipient: ComponentId,
        operation: &'static str,
    ) -> Result<(), CapabilityError> {
        if self.is_authorized(caller, recipient, operation) {
            Ok(())
        } else {
            Err(CapabilityError {
                caller,
                recipient,
                operation,
            })
        }
    }
}

impl Default for CapabilityMatrix {
    fn default() -> Self {
        Self::new()
    }
}
