//! Domain logic for the Executor

pub mod digest;

pub use digest::{authorization_message, operations_hash, receipt_hash, AUTHORIZATION_DOMAIN};
