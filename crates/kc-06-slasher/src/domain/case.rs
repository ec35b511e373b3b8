//! # Slashing Cases
//!
//! ```text
//!            appeal (accused, step < deadline)
//! [Pending] ───────────────────────────────→ [Appealed]
//!     │                                          │ resolve_appeal (resolver)
//!     │ finalize (step >= deadline)              │ finalize (step >= deadline)
//!     ↓                                          ↓
//! [ResolvedSlashed]                 [ResolvedSlashed | ResolvedCleared]
//! ```
//!
//! Terminal states accept no further transitions.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, CaseId, Hash, SequenceNumber, Step, Verdict};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseState {
    Pending,
    Appealed {
        counter_evidence: Hash,
        appealed_at: Step,
        /// Recorded by the resolver, applied at finalize
        verdict: Option<Verdict>,
    },
    ResolvedSlashed {
        amount: Amount,
        resolved_at: Step,
    },
    ResolvedCleared {
        resolved_at: Step,
    },
}

impl CaseState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ResolvedSlashed { .. } | Self::ResolvedCleared { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Appealed { .. } => "appealed",
            Self::ResolvedSlashed { .. } => "resolved-slashed",
            Self::ResolvedCleared { .. } => "resolved-cleared",
        }
    }
}

/// A misbehavior claim against one keyper for one executed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashingCase {
    pub id: CaseId,
    pub accused: Address,
    /// Executed batch the evidence refers to
    pub sequence: SequenceNumber,
    pub evidence: Hash,
    pub opener: Address,
    pub opened_at: Step,
    /// Fixed at creation, never extended
    pub appeal_deadline: Step,
    pub state: CaseState,
}

impl SlashingCase {
    pub fn is_open(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn appeal_window_open(&self, now: Step) -> bool {
        now < self.appeal_deadline
    }
}

/// Result of `raise_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaisedCase {
    pub case_id: CaseId,
    /// False when an open case for the same tuple already existed
    pub created: bool,
}

/// Result of a successful `finalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseOutcome {
    pub case_id: CaseId,
    pub accused: Address,
    pub verdict: Verdict,
    pub slashed: Amount,
    pub recipient: Address,
}
