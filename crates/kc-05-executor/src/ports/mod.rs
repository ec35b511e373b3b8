//! Ports for the Executor

pub mod outbound;

pub use outbound::{BatchTarget, ConfigQuery, QuorumVerifier, TargetError};
