//! # kc-04-batcher
//!
//! BatchRegistry: the ordered log of submitted encrypted batches and, once
//! executed, their receipts. Sequence numbers give the executor a total
//! order to authenticate against.
//!
//! ```text
//! submit_batch ──FeeSpender──→ FeeEscrow
//!      │
//!      └──→ Batch #n ──(executor)──→ ExecutedBatch #n ──(slasher evidence)
//! ```

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{Batch, ExecutedBatch, Operation};
pub use error::{BatcherError, BatcherResult};
pub use ports::ExecutedBatches;
pub use service::BatchRegistry;
