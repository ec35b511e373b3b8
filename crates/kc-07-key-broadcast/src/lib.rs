//! # kc-07-key-broadcast
//!
//! KeyBroadcast: append-only, epoch-keyed decryption key material. Each
//! configuration epoch gets at most one key, published by a member of that
//! epoch's keyper set once the epoch is in effect.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::KeyMaterial;
pub use error::{KeyBroadcastError, KeyBroadcastResult};
pub use service::KeyBroadcast;
