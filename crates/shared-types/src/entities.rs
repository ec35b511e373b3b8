//! # Core Primitives
//!
//! Identities are opaque 20-byte principals (Ethereum-style addresses),
//! amounts are unsigned token units and time is measured in steps (blocks).

use serde::{Deserialize, Serialize};

/// A 32-byte digest (keccak256 unless stated otherwise).
pub type Hash = [u8; 32];

/// A 20-byte addressable principal.
pub type Address = [u8; 20];

/// Position in the global ordering of committed steps (block number).
pub type Step = u64;

/// Token amount in base units.
pub type Amount = u128;

/// Batch sequence number. Assigned from 0 with no gaps.
pub type SequenceNumber = u64;

/// Identifier of a slashing case. Assigned from 0 in creation order.
pub type CaseId = u64;

/// Index of a configuration epoch. The genesis epoch is 0.
pub type EpochId = u64;

/// Destination for burned stake.
pub const BURN_ADDRESS: Address = [0u8; 20];

/// Zero digest, used as the empty evidence marker.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Outcome of adjudicating a slashing case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Misbehavior upheld; the accused forfeits stake.
    Slash,
    /// Evidence rejected; the accused keeps their stake.
    Clear,
}

impl Verdict {
    /// Lowercase name used in event attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slash => "slash",
            Self::Clear => "clear",
        }
    }
}

/// Short hex prefix of an identifier, for log fields.
pub fn short_hex(bytes: &[u8]) -> String {
    let end = bytes.len().min(4);
    hex::encode(&bytes[..end])
}

/// Full `0x`-prefixed hex rendering of an address.
pub fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}
