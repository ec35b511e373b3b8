//! Adapters for the Executor's outbound ports

pub mod ecdsa_quorum;

pub use ecdsa_quorum::{sign_authorization, EcdsaQuorumVerifier};
