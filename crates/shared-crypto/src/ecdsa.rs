//! # Recoverable ECDSA Signatures (secp256k1)
//!
//! Keypers sign 32-byte prehashes; verifiers recover the signer's
//! Ethereum-style address and compare it with the keyper set.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2), enforced again on recovery
//! - Signature layout: `r (32) || s (32) || v (1)`, `v` in {0, 1, 27, 28}

use crate::hashing::keccak256;
use crate::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Address, Hash};
use zeroize::Zeroizing;

/// Length of a recoverable signature in bytes.
pub const SIGNATURE_LENGTH: usize = 65;

/// `r || s || v` recoverable signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature([u8; SIGNATURE_LENGTH]);

impl RecoverableSignature {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice of exactly [`SIGNATURE_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSignatureLength {
                    expected: SIGNATURE_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Recover the signer address for `message_hash`.
    pub fn recover(&self, message_hash: &Hash) -> Result<Address, CryptoError> {
        recover_address(message_hash, self)
    }
}

/// secp256k1 keypair held by a keyper.
pub struct KeyperKeyPair {
    signing_key: SigningKey,
}

impl KeyperKeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Ethereum-style address of this keypair.
    pub fn address(&self) -> Address {
        address_from_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash.
    pub fn sign_prehash(&self, message_hash: &Hash) -> Result<RecoverableSignature, CryptoError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(message_hash)
            .map_err(|_| CryptoError::SigningFailed)?;

        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(RecoverableSignature(bytes))
    }

    /// Secret key bytes, wiped when the returned buffer is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }
}

/// Recover the signer's address from a signature over `message_hash`.
pub fn recover_address(
    message_hash: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    let bytes = signature.as_bytes();
    let recovery_id = parse_recovery_id(bytes[64])?;

    let sig =
        Signature::from_slice(&bytes[..64]).map_err(|_| CryptoError::InvalidSignatureFormat)?;
    // EIP-2: high-S signatures are malleable copies of a low-S one
    if sig.normalize_s().is_some() {
        return Err(CryptoError::InvalidSignatureFormat);
    }

    let key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(address_from_key(&key))
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let normalized = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        other => return Err(CryptoError::InvalidRecoveryId(other)),
    };
    RecoveryId::from_byte(normalized).ok_or(CryptoError::InvalidRecoveryId(v))
}

/// Last 20 bytes of keccak256 over the uncompressed public key (sans 0x04).
fn address_from_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}
