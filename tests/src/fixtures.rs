//! # Test Fixtures
//!
//! A fully wired [`KeyperChain`] over in-memory collaborators, with three
//! funded keypers (threshold 2), a heads-up delay of 30 steps and an appeal
//! window of 10 steps.

use kc_01_config::{BatchConfig, FeeSchedule};
use kc_04_batcher::{ExecutedBatch, Operation};
use kc_05_executor::{
    authorization_message, operations_hash, sign_authorization, EcdsaQuorumVerifier,
};
use kc_06_slasher::{SlashPenalty, SlasherSettings};
use keyper_node::adapters::{GovernanceArbiter, InMemoryTarget, InMemoryTokenLedger};
use keyper_node::{Collaborators, KeyperChain, ProtocolResult, ProtocolState};
use shared_bus::InMemoryEventBus;
use shared_crypto::KeyperKeyPair;
use shared_types::{Address, Amount, SequenceNumber, Step, BURN_ADDRESS};
use std::sync::Arc;

pub const GOVERNANCE: Address = [0xA0; 20];
pub const RESOLVER: Address = [0xA1; 20];
pub const SUBMITTER: Address = [0x51; 20];
pub const WATCHER: Address = [0x77; 20];
pub const RELAYER: Address = [0x88; 20];

pub const HEADS_UP_DELAY: Step = 30;
pub const APPEAL_WINDOW: Step = 10;
pub const MIN_STAKE: Amount = 100;
pub const BASE_FEE: Amount = 10;
pub const FEE_PER_BYTE: Amount = 1;

/// Wallet balance minted for every test identity.
pub const FUNDING: Amount = 1_000_000;

pub struct TestNetwork {
    pub chain: KeyperChain,
    pub ledger: Arc<InMemoryTokenLedger>,
    pub target: Arc<InMemoryTarget>,
    pub arbiter: Arc<GovernanceArbiter>,
    pub keypers: Vec<KeyperKeyPair>,
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TestNetwork {
    pub fn new() -> Self {
        Self::with_penalty(SlashPenalty::FullStake)
    }

    pub fn with_penalty(penalty: SlashPenalty) -> Self {
        let keypers = keyper_keys(1..=3);
        let genesis = batch_config(&keypers, 2);
        let settings = SlasherSettings {
            appeal_window: APPEAL_WINDOW,
            resolver: RESOLVER,
            penalty,
            recipient: BURN_ADDRESS,
        };
        let state = ProtocolState::genesis(
            GOVERNANCE,
            HEADS_UP_DELAY,
            genesis,
            settings,
            MIN_STAKE,
            0,
        )
        .expect("genesis state");

        let ledger = Arc::new(InMemoryTokenLedger::new());
        let target = Arc::new(InMemoryTarget::new());
        let arbiter = Arc::new(GovernanceArbiter::new());
        for account in [SUBMITTER, WATCHER, RELAYER] {
            ledger.mint(&account, FUNDING);
        }
        for key in &keypers {
            ledger.mint(&key.address(), FUNDING);
        }

        let collaborators = Collaborators {
            ledger: ledger.clone(),
            target: target.clone(),
            verifier: Arc::new(EcdsaQuorumVerifier::new()),
            arbiter: arbiter.clone(),
        };
        Self {
            chain: KeyperChain::new(state, collaborators, Arc::new(InMemoryEventBus::new())),
            ledger,
            target,
            arbiter,
            keypers,
        }
    }

    pub fn keyper(&self, index: usize) -> Address {
        self.keypers[index].address()
    }

    /// Deposit `amount` of stake for every genesis keyper.
    pub fn stake_all(&self, amount: Amount) {
        for key in &self.keypers {
            self.chain
                .deposit(&key.address(), amount)
                .expect("keyper stake deposit");
        }
    }

    /// Prepay and submit `payload` at the minimum fee. Returns its sequence.
    pub fn submit(&self, payload: &[u8]) -> SequenceNumber {
        let fee = minimum_fee(payload);
        self.chain
            .deposit_fee(&SUBMITTER, fee)
            .expect("fee deposit");
        self.chain
            .submit_batch(&SUBMITTER, payload, fee)
            .expect("batch submission")
            .sequence
    }

    /// Authorization for `operations` of batch `sequence` signed by the
    /// keypers at `signers`.
    pub fn authorize(
        &self,
        sequence: SequenceNumber,
        operations: &[Operation],
        signers: &[usize],
    ) -> Vec<u8> {
        let batch = self.chain.batch(sequence).expect("submitted batch");
        let message =
            authorization_message(sequence, &batch.payload_ref, &operations_hash(operations));
        let keys: Vec<&KeyperKeyPair> = signers.iter().map(|&i| &self.keypers[i]).collect();
        sign_authorization(&keys, &message).expect("signing")
    }

    /// Execute `sequence` with a quorum of keypers 0 and 1.
    pub fn execute(
        &self,
        sequence: SequenceNumber,
        operations: Vec<Operation>,
    ) -> ProtocolResult<ExecutedBatch> {
        let authorization = self.authorize(sequence, &operations, &[0, 1]);
        self.chain
            .execute_batch(sequence, operations, authorization, &RELAYER)
    }

    /// Submit and execute one batch. Returns its sequence.
    pub fn executed_batch(&self, payload: &[u8], operations: Vec<Operation>) -> SequenceNumber {
        let sequence = self.submit(payload);
        self.execute(sequence, operations).expect("batch execution");
        sequence
    }
}

pub fn keyper_keys(seeds: std::ops::RangeInclusive<u8>) -> Vec<KeyperKeyPair> {
    seeds
        .map(|i| KeyperKeyPair::from_bytes([i; 32]).expect("valid secret key"))
        .collect()
}

pub fn batch_config(keypers: &[KeyperKeyPair], threshold: u32) -> BatchConfig {
    BatchConfig {
        keypers: keypers.iter().map(KeyperKeyPair::address).collect(),
        threshold,
        fee_schedule: FeeSchedule {
            base_fee: BASE_FEE,
            fee_per_byte: FEE_PER_BYTE,
        },
        max_payload_bytes: 1024,
    }
}

pub fn minimum_fee(payload: &[u8]) -> Amount {
    BASE_FEE + FEE_PER_BYTE * payload.len() as Amount
}
