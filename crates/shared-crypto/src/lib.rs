//! # Shared Crypto
//!
//! Cryptographic primitives used at the protocol edge.
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256 | Payload references, receipts, evidence digests |
//! | `ecdsa` | secp256k1 (recoverable) | Keyper quorum signatures |
//!
//! The threshold-decryption scheme itself is an external collaborator and
//! is not implemented here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

pub use ecdsa::{recover_address, KeyperKeyPair, RecoverableSignature, SIGNATURE_LENGTH};
pub use errors::CryptoError;
pub use hashing::{keccak256, keccak256_many, KeccakHasher};
