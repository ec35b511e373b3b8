//! Error types for the Slasher

use kc_01_config::ConfigError;
use kc_02_deposits::DepositError;
use shared_types::{Address, CaseId, SequenceNumber, Step};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlasherError {
    #[error("Unauthorized: {caller:?}")]
    Unauthorized { caller: Address },

    #[error("Unknown case {case_id}")]
    UnknownCase { case_id: CaseId },

    /// Evidence must reference an executed batch
    #[error("Batch {sequence} has not been executed")]
    UnknownBatch { sequence: SequenceNumber },

    #[error("{accused:?} was not a keyper when batch {sequence} executed")]
    NotAKeyper {
        accused: Address,
        sequence: SequenceNumber,
    },

    /// The same (accused, batch, evidence) tuple was already adjudicated
    #[error("Duplicate of resolved case {case_id}")]
    DuplicateCase { case_id: CaseId },

    #[error("Case {case_id} already resolved")]
    AlreadyResolved { case_id: CaseId },

    #[error("Case {case_id} already appealed")]
    AlreadyAppealed { case_id: CaseId },

    #[error("Appeal window of case {case_id} closed at step {deadline}")]
    AppealWindowClosed { case_id: CaseId, deadline: Step },

    #[error("Case {case_id} has not been appealed")]
    NotAppealed { case_id: CaseId },

    #[error("Verdict for case {case_id} already recorded")]
    VerdictAlreadyRecorded { case_id: CaseId },

    #[error("Case {case_id} cannot be finalized before step {deadline}")]
    NotYetExpired { case_id: CaseId, deadline: Step },

    /// Appealed and past the deadline, but no verdict yet
    #[error("Case {case_id} awaits arbitration")]
    ArbitrationPending { case_id: CaseId },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deposit(#[from] DepositError),
}

pub type SlasherResult<T> = Result<T, SlasherError>;
