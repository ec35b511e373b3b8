//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid signature length
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Recovery id outside 0, 1, 27, 28
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// r or s not a valid scalar
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Public key could not be recovered from the signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signing failed
    #[error("Signing failed")]
    SigningFailed,
}
