//! # Event Attribute Codec
//!
//! Flat `kind` + key/value form of [`ProtocolEvent`], the shape keypers and
//! other watchers index on. Integers are decimal; addresses, hashes and raw
//! bytes are `0x`-prefixed hex; keyper lists are comma separated.

use crate::events::ProtocolEvent;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, Verdict};
use std::str::FromStr;
use thiserror::Error;

/// Errors decoding an [`EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventDecodeError {
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    #[error("Event {kind} is missing attribute {key}")]
    MissingAttribute { kind: String, key: &'static str },

    #[error("Event {kind} has malformed attribute {key}: {value}")]
    BadAttribute {
        kind: String,
        key: &'static str,
        value: String,
    },
}

/// Observer-facing wire form of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl EventRecord {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: Vec::new(),
        }
    }

    fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    fn with_hex(self, key: &str, bytes: &[u8]) -> Self {
        self.with(key, format!("0x{}", hex::encode(bytes)))
    }

    /// Look an attribute up by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, key: &'static str) -> Result<&str, EventDecodeError> {
        self.get(key).ok_or_else(|| EventDecodeError::MissingAttribute {
            kind: self.kind.clone(),
            key,
        })
    }

    fn bad(&self, key: &'static str, value: &str) -> EventDecodeError {
        EventDecodeError::BadAttribute {
            kind: self.kind.clone(),
            key,
            value: value.to_string(),
        }
    }

    fn number<T: FromStr>(&self, key: &'static str) -> Result<T, EventDecodeError> {
        let raw = self.require(key)?;
        raw.parse().map_err(|_| self.bad(key, raw))
    }

    fn bytes(&self, key: &'static str) -> Result<Vec<u8>, EventDecodeError> {
        let raw = self.require(key)?;
        decode_hex(raw).ok_or_else(|| self.bad(key, raw))
    }

    fn fixed<const N: usize>(&self, key: &'static str) -> Result<[u8; N], EventDecodeError> {
        let raw = self.require(key)?;
        decode_hex(raw)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| self.bad(key, raw))
    }

    fn address(&self, key: &'static str) -> Result<Address, EventDecodeError> {
        self.fixed::<20>(key)
    }

    fn hash(&self, key: &'static str) -> Result<Hash, EventDecodeError> {
        self.fixed::<32>(key)
    }

    fn addresses(&self, key: &'static str) -> Result<Vec<Address>, EventDecodeError> {
        let raw = self.require(key)?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        raw.split(',')
            .map(|part| {
                decode_hex(part)
                    .and_then(|bytes| bytes.try_into().ok())
                    .ok_or_else(|| self.bad(key, raw))
            })
            .collect()
    }

    fn verdict(&self, key: &'static str) -> Result<Verdict, EventDecodeError> {
        match self.require(key)? {
            "slash" => Ok(Verdict::Slash),
            "clear" => Ok(Verdict::Clear),
            other => Err(self.bad(key, other)),
        }
    }
}

fn decode_hex(raw: &str) -> Option<Vec<u8>> {
    hex::decode(raw.strip_prefix("0x")?).ok()
}

fn join_addresses(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(|a| format!("0x{}", hex::encode(a)))
        .collect::<Vec<_>>()
        .join(",")
}

impl ProtocolEvent {
    /// Event kind as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigScheduled { .. } => "config_scheduled",
            Self::StakeDeposited { .. } => "stake_deposited",
            Self::StakeWithdrawn { .. } => "stake_withdrawn",
            Self::StakeSlashed { .. } => "stake_slashed",
            Self::FeeDeposited { .. } => "fee_deposited",
            Self::FeeWithdrawn { .. } => "fee_withdrawn",
            Self::FeesReleased { .. } => "fees_released",
            Self::BatchSubmitted { .. } => "batch_submitted",
            Self::BatchExecuted { .. } => "batch_executed",
            Self::CaseRaised { .. } => "case_raised",
            Self::CaseAppealed { .. } => "case_appealed",
            Self::VerdictRecorded { .. } => "verdict_recorded",
            Self::CaseResolved { .. } => "case_resolved",
            Self::KeyPublished { .. } => "key_published",
        }
    }

    /// Flatten into key/value attributes.
    pub fn to_record(&self) -> EventRecord {
        let record = EventRecord::new(self.kind()).with("step", self.step());
        match self {
            Self::ConfigScheduled {
                epoch,
                effective_from,
                keypers,
                threshold,
                ..
            } => record
                .with("epoch", epoch)
                .with("effective_from", effective_from)
                .with("keypers", join_addresses(keypers))
                .with("threshold", threshold),
            Self::StakeDeposited {
                owner,
                amount,
                balance,
                ..
            }
            | Self::StakeWithdrawn {
                owner,
                amount,
                balance,
                ..
            }
            | Self::FeeDeposited {
                owner,
                amount,
                balance,
                ..
            }
            | Self::FeeWithdrawn {
                owner,
                amount,
                balance,
                ..
            } => record
                .with_hex("owner", owner)
                .with("amount", amount)
                .with("balance", balance),
            Self::StakeSlashed {
                case_id,
                owner,
                amount,
                recipient,
                ..
            } => record
                .with("case_id", case_id)
                .with_hex("owner", owner)
                .with("amount", amount)
                .with_hex("recipient", recipient),
            Self::FeesReleased {
                recipient, amount, ..
            } => record.with_hex("recipient", recipient).with("amount", amount),
            Self::BatchSubmitted {
                sequence,
                payload_ref,
                submitter,
                fee,
                ..
            } => record
                .with("sequence", sequence)
                .with_hex("payload_ref", payload_ref)
                .with_hex("submitter", submitter)
                .with("fee", fee),
            Self::BatchExecuted {
                sequence,
                operations_hash,
                receipt_hash,
                executor,
                ..
            } => record
                .with("sequence", sequence)
                .with_hex("operations_hash", operations_hash)
                .with_hex("receipt_hash", receipt_hash)
                .with_hex("executor", executor),
            Self::CaseRaised {
                case_id,
                accused,
                sequence,
                evidence,
                opener,
                appeal_deadline,
                ..
            } => record
                .with("case_id", case_id)
                .with_hex("accused", accused)
                .with("sequence", sequence)
                .with_hex("evidence", evidence)
                .with_hex("opener", opener)
                .with("appeal_deadline", appeal_deadline),
            Self::CaseAppealed {
                case_id,
                counter_evidence,
                ..
            } => record
                .with("case_id", case_id)
                .with_hex("counter_evidence", counter_evidence),
            Self::VerdictRecorded {
                case_id, verdict, ..
            } => record
                .with("case_id", case_id)
                .with("verdict", verdict.as_str()),
            Self::CaseResolved {
                case_id,
                accused,
                verdict,
                slashed,
                ..
            } => record
                .with("case_id", case_id)
                .with_hex("accused", accused)
                .with("verdict", verdict.as_str())
                .with("slashed", slashed),
            Self::KeyPublished {
                epoch,
                publisher,
                key,
                ..
            } => record
                .with("epoch", epoch)
                .with_hex("publisher", publisher)
                .with_hex("key", key),
        }
    }
}

impl TryFrom<&EventRecord> for ProtocolEvent {
    type Error = EventDecodeError;

    fn try_from(r: &EventRecord) -> Result<Self, Self::Error> {
        let step = r.number("step")?;
        let event = match r.kind.as_str() {
            "config_scheduled" => Self::ConfigScheduled {
                step,
                epoch: r.number("epoch")?,
                effective_from: r.number("effective_from")?,
                keypers: r.addresses("keypers")?,
                threshold: r.number("threshold")?,
            },
            "stake_deposited" => Self::StakeDeposited {
                step,
                owner: r.address("owner")?,
                amount: r.number("amount")?,
                balance: r.number("balance")?,
            },
            "stake_withdrawn" => Self::StakeWithdrawn {
                step,
                owner: r.address("owner")?,
                amount: r.number("amount")?,
                balance: r.number("balance")?,
            },
            "stake_slashed" => Self::StakeSlashed {
                step,
                case_id: r.number("case_id")?,
                owner: r.address("owner")?,
                amount: r.number("amount")?,
                recipient: r.address("recipient")?,
            },
            "fee_deposited" => Self::FeeDeposited {
                step,
                owner: r.address("owner")?,
                amount: r.number("amount")?,
                balance: r.number("balance")?,
            },
            "fee_withdrawn" => Self::FeeWithdrawn {
                step,
                owner: r.address("owner")?,
                amount: r.number("amount")?,
                balance: r.number("balance")?,
            },
            "fees_released" => Self::FeesReleased {
                step,
                recipient: r.address("recipient")?,
                amount: r.number("amount")?,
            },
            "batch_submitted" => Self::BatchSubmitted {
                step,
                sequence: r.number("sequence")?,
                payload_ref: r.hash("payload_ref")?,
                submitter: r.address("submitter")?,
                fee: r.number("fee")?,
            },
            "batch_executed" => Self::BatchExecuted {
                step,
                sequence: r.number("sequence")?,
                operations_hash: r.hash("operations_hash")?,
                receipt_hash: r.hash("receipt_hash")?,
                executor: r.address("executor")?,
            },
            "case_raised" => Self::CaseRaised {
                step,
                case_id: r.number("case_id")?,
                accused: r.address("accused")?,
                sequence: r.number("sequence")?,
                evidence: r.hash("evidence")?,
                opener: r.address("opener")?,
                appeal_deadline: r.number("appeal_deadline")?,
            },
            "case_appealed" => Self::CaseAppealed {
                step,
                case_id: r.number("case_id")?,
                counter_evidence: r.hash("counter_evidence")?,
            },
            "verdict_recorded" => Self::VerdictRecorded {
                step,
                case_id: r.number("case_id")?,
                verdict: r.verdict("verdict")?,
            },
            "case_resolved" => Self::CaseResolved {
                step,
                case_id: r.number("case_id")?,
                accused: r.address("accused")?,
                verdict: r.verdict("verdict")?,
                slashed: r.number("slashed")?,
            },
            "key_published" => Self::KeyPublished {
                step,
                epoch: r.number("epoch")?,
                publisher: r.address("publisher")?,
                key: r.bytes("key")?,
            },
            other => return Err(EventDecodeError::UnknownKind(other.to_string())),
        };
        Ok(event)
    }
}

impl TryFrom<EventRecord> for ProtocolEvent {
    type Error = EventDecodeError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        Self::try_from(&record)
    }
}
