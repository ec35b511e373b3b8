//! Arbitration by pre-registered governance decisions.
//!
//! The resolver records a verdict per case off-chain; `arbitrate` looks it
//! up. Cases without a registered decision are cleared.

use kc_06_slasher::{Arbiter, SlashingCase};
use parking_lot::RwLock;
use shared_types::{CaseId, Hash, Verdict};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct GovernanceArbiter {
    decisions: RwLock<HashMap<CaseId, Verdict>>,
}

impl GovernanceArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decisions(decisions: HashMap<CaseId, Verdict>) -> Self {
        Self {
            decisions: RwLock::new(decisions),
        }
    }

    /// Every registered decision, for persistence.
    pub fn decisions(&self) -> HashMap<CaseId, Verdict> {
        self.decisions.read().clone()
    }

    /// Register (or replace) the decision for `case_id`.
    pub fn decide(&self, case_id: CaseId, verdict: Verdict) {
        self.decisions.write().insert(case_id, verdict);
    }

    pub fn decision(&self, case_id: CaseId) -> Option<Verdict> {
        self.decisions.read().get(&case_id).copied()
    }
}

impl Arbiter for GovernanceArbiter {
    fn arbitrate(&self, case: &SlashingCase, _counter_evidence: &Hash) -> Verdict {
        let verdict = self.decision(case.id).unwrap_or(Verdict::Clear);
        debug!(case_id = case.id, verdict = verdict.as_str(), "Arbiter consulted");
        verdict
    }
}
