//! # Keccak-256 Hashing
//!
//! Ethereum-compatible Keccak-256 (not NIST SHA3-256).

use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// Stateful Keccak-256 hasher.
pub struct KeccakHasher {
    inner: Keccak256,
}

impl KeccakHasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Keccak256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Update with a big-endian u64.
    pub fn update_u64(&mut self, value: u64) -> &mut Self {
        self.inner.update(value.to_be_bytes());
        self
    }

    /// Update with a length prefix followed by the data, so that
    /// concatenations of variable-length fields stay unambiguous.
    pub fn update_prefixed(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update((data.len() as u64).to_be_bytes());
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }
}

impl Default for KeccakHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Keccak-256 of `data` (one-shot).
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Keccak-256 over the plain concatenation of `inputs`.
pub fn keccak256_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = KeccakHasher::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize()
}
