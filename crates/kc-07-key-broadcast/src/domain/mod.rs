//! Domain types for the KeyBroadcast

pub mod key;

pub use key::KeyMaterial;
