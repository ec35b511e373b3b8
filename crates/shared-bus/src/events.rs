//! # Protocol Events
//!
//! One variant per committed state transition. Events are the only way
//! off-chain observers (keypers, the target, arbitration tooling) learn of
//! state changes, so each carries the step it committed at and the
//! identifiers needed to look the affected records up again.

use serde::{Deserialize, Serialize};
use shared_types::{
    Address, Amount, CaseId, ComponentId, EpochId, Hash, SequenceNumber, Step, Verdict,
};

/// All events that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolEvent {
    // =========================================================================
    // CONFIG STORE
    // =========================================================================
    /// A configuration epoch was scheduled. It takes effect at
    /// `effective_from`, never earlier.
    ConfigScheduled {
        step: Step,
        epoch: EpochId,
        effective_from: Step,
        keypers: Vec<Address>,
        threshold: u32,
    },

    // =========================================================================
    // DEPOSIT LEDGER
    // =========================================================================
    StakeDeposited {
        step: Step,
        owner: Address,
        amount: Amount,
        balance: Amount,
    },

    StakeWithdrawn {
        step: Step,
        owner: Address,
        amount: Amount,
        balance: Amount,
    },

    /// Stake forfeited by a finalized case and forwarded to `recipient`.
    StakeSlashed {
        step: Step,
        case_id: CaseId,
        owner: Address,
        amount: Amount,
        recipient: Address,
    },

    // =========================================================================
    // FEE ESCROW
    // =========================================================================
    FeeDeposited {
        step: Step,
        owner: Address,
        amount: Amount,
        balance: Amount,
    },

    FeeWithdrawn {
        step: Step,
        owner: Address,
        amount: Amount,
        balance: Amount,
    },

    /// Collected (spent) fees paid out by governance.
    FeesReleased {
        step: Step,
        recipient: Address,
        amount: Amount,
    },

    // =========================================================================
    // BATCH REGISTRY / EXECUTOR
    // =========================================================================
    BatchSubmitted {
        step: Step,
        sequence: SequenceNumber,
        payload_ref: Hash,
        submitter: Address,
        fee: Amount,
    },

    BatchExecuted {
        step: Step,
        sequence: SequenceNumber,
        operations_hash: Hash,
        receipt_hash: Hash,
        executor: Address,
    },

    // =========================================================================
    // SLASHER
    // =========================================================================
    CaseRaised {
        step: Step,
        case_id: CaseId,
        accused: Address,
        sequence: SequenceNumber,
        evidence: Hash,
        opener: Address,
        appeal_deadline: Step,
    },

    CaseAppealed {
        step: Step,
        case_id: CaseId,
        counter_evidence: Hash,
    },

    /// The arbiter's decision on an appealed case. Applied at finalize.
    VerdictRecorded {
        step: Step,
        case_id: CaseId,
        verdict: Verdict,
    },

    /// A case reached a terminal state.
    CaseResolved {
        step: Step,
        case_id: CaseId,
        accused: Address,
        verdict: Verdict,
        slashed: Amount,
    },

    // =========================================================================
    // KEY BROADCAST
    // =========================================================================
    KeyPublished {
        step: Step,
        epoch: EpochId,
        publisher: Address,
        key: Vec<u8>,
    },
}

impl ProtocolEvent {
    /// Step at which the transition committed.
    pub fn step(&self) -> Step {
        match self {
            Self::ConfigScheduled { step, .. }
            | Self::StakeDeposited { step, .. }
            | Self::StakeWithdrawn { step, .. }
            | Self::StakeSlashed { step, .. }
            | Self::FeeDeposited { step, .. }
            | Self::FeeWithdrawn { step, .. }
            | Self::FeesReleased { step, .. }
            | Self::BatchSubmitted { step, .. }
            | Self::BatchExecuted { step, .. }
            | Self::CaseRaised { step, .. }
            | Self::CaseAppealed { step, .. }
            | Self::VerdictRecorded { step, .. }
            | Self::CaseResolved { step, .. }
            | Self::KeyPublished { step, .. } => *step,
        }
    }

    /// Get the topic for this event.
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ConfigScheduled { .. } => EventTopic::Config,
            Self::StakeDeposited { .. }
            | Self::StakeWithdrawn { .. }
            | Self::StakeSlashed { .. } => EventTopic::Deposits,
            Self::FeeDeposited { .. } | Self::FeeWithdrawn { .. } | Self::FeesReleased { .. } => {
                EventTopic::FeeBank
            }
            Self::BatchSubmitted { .. } => EventTopic::Batcher,
            Self::BatchExecuted { .. } => EventTopic::Executor,
            Self::CaseRaised { .. }
            | Self::CaseAppealed { .. }
            | Self::VerdictRecorded { .. }
            | Self::CaseResolved { .. } => EventTopic::Slasher,
            Self::KeyPublished { .. } => EventTopic::KeyBroadcast,
        }
    }

    /// Component that committed the transition.
    pub fn source(&self) -> ComponentId {
        match self {
            Self::ConfigScheduled { .. } => ComponentId::ConfigStore,
            Self::StakeDeposited { .. }
            | Self::StakeWithdrawn { .. }
            | Self::StakeSlashed { .. } => ComponentId::DepositLedger,
            Self::FeeDeposited { .. } | Self::FeeWithdrawn { .. } | Self::FeesReleased { .. } => {
                ComponentId::FeeEscrow
            }
            Self::BatchSubmitted { .. } => ComponentId::BatchRegistry,
            Self::BatchExecuted { .. } => ComponentId::Executor,
            Self::CaseRaised { .. }
            | Self::CaseAppealed { .. }
            | Self::VerdictRecorded { .. }
            | Self::CaseResolved { .. } => ComponentId::Slasher,
            Self::KeyPublished { .. } => ComponentId::KeyBroadcast,
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Config,
    Deposits,
    FeeBank,
    Batcher,
    Executor,
    Slasher,
    KeyBroadcast,
    /// Matches every event.
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Only events committed at or after this step.
    pub from_step: Option<Step>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            from_step: None,
        }
    }

    /// Restrict to events committed at or after `step`.
    #[must_use]
    pub fn since(mut self, step: Step) -> Self {
        self.from_step = Some(step);
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ProtocolEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let step_match = self.from_step.map_or(true, |from| event.step() >= from);

        topic_match && step_match
    }
}
