//! ECDSA Quorum Adapter
//!
//! Implements [`QuorumVerifier`] over concatenated 65-byte recoverable
//! secp256k1 signatures. Each signature is recovered to an address; the
//! quorum counts distinct recovered addresses that belong to the keyper set.

use crate::ports::outbound::QuorumVerifier;
use shared_crypto::{CryptoError, KeyperKeyPair, RecoverableSignature, SIGNATURE_LENGTH};
use shared_types::{short_hex, Address, Hash};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct EcdsaQuorumVerifier;

impl EcdsaQuorumVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl QuorumVerifier for EcdsaQuorumVerifier {
    fn verify_quorum(
        &self,
        keypers: &[Address],
        threshold: u32,
        message: &Hash,
        authorization: &[u8],
    ) -> bool {
        if authorization.len() % SIGNATURE_LENGTH != 0 {
            warn!(
                len = authorization.len(),
                "[kc-05] Authorization is not a whole number of signatures"
            );
            return false;
        }

        let mut signers = HashSet::new();
        for chunk in authorization.chunks_exact(SIGNATURE_LENGTH) {
            let signer = RecoverableSignature::from_slice(chunk).and_then(|s| s.recover(message));
            match signer {
                Ok(address) if keypers.contains(&address) => {
                    signers.insert(address);
                }
                Ok(address) => {
                    debug!(signer = %short_hex(&address), "[kc-05] Ignoring non-keyper signature");
                }
                Err(e) => {
                    debug!(error = %e, "[kc-05] Ignoring unrecoverable signature");
                }
            }
        }

        let approvals = signers.len();
        debug!(approvals, threshold, "[kc-05] Quorum tally");
        approvals >= threshold as usize
    }
}

/// Concatenate each signer's signature over `message` into one
/// authorization blob.
pub fn sign_authorization(
    signers: &[&KeyperKeyPair],
    message: &Hash,
) -> Result<Vec<u8>, CryptoError> {
    let mut authorization = Vec::with_capacity(signers.len() * SIGNATURE_LENGTH);
    for signer in signers {
        authorization.extend_from_slice(signer.sign_prehash(message)?.as_bytes());
    }
    Ok(authorization)
}
