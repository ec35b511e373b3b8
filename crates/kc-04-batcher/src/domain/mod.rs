//! Domain types for the BatchRegistry

pub mod batch;

pub use batch::{Batch, ExecutedBatch, Operation};
