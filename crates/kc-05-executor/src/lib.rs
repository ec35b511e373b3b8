//! # kc-05-executor
//!
//! Executor: validates quorum authorization and replays a batch's
//! decrypted operations against the external target, in strict sequence.
//!
//! ## Architecture
//!
//! ```text
//! BatchRegistry ──Batch #n──→ Executor ──operations──→ BatchTarget
//!                                │
//!                                ├── QuorumVerifier (active keyper set)
//!                                └── ExecutedBatch #n ──→ BatchRegistry
//! ```
//!
//! ## Ports
//!
//! | Port | Direction | Adapter |
//! |------|-----------|---------|
//! | [`QuorumVerifier`] | outbound | [`EcdsaQuorumVerifier`] |
//! | [`BatchTarget`] | outbound | supplied by the runtime |

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{sign_authorization, EcdsaQuorumVerifier};
pub use domain::{authorization_message, operations_hash, receipt_hash};
pub use error::{ExecutorError, ExecutorResult};
pub use ports::{BatchTarget, QuorumVerifier, TargetError};
pub use service::Executor;
