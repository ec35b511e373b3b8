//! # KeyperChain
//!
//! The serialized step engine. Every entry point runs as one atomic
//! transition at the current step:
//!
//! ```text
//!   write lock ──→ clone state ──→ apply ──┬─ Ok  ──→ swap in, publish events
//!                                          └─ Err ──→ drop clone, publish nothing
//! ```
//!
//! Within an operation, components make their single external call (token
//! transfer or target execution) after every check that can fail, so a
//! rejected operation never leaves an external effect behind.
//!
//! Events are published while the write lock is held; observers therefore
//! see them in commit order.

use crate::adapters::KeyperBond;
use crate::error::{ProtocolError, ProtocolResult};
use crate::state::ProtocolState;
use kc_01_config::{BatchConfig, ConfigEpoch};
use kc_04_batcher::{Batch, ExecutedBatch, Operation};
use kc_05_executor::{BatchTarget, Executor, QuorumVerifier};
use kc_06_slasher::{Arbiter, CaseOutcome, RaisedCase, SlashingCase};
use kc_07_key_broadcast::KeyMaterial;
use parking_lot::RwLock;
use shared_bus::{EventFilter, EventPublisher, InMemoryEventBus, ProtocolEvent, Subscription};
use shared_types::{
    Address, Amount, CaseId, EpochId, Hash, SequenceNumber, Step, TokenLedger, Verdict,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// External collaborators the protocol calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn TokenLedger>,
    pub target: Arc<dyn BatchTarget>,
    pub verifier: Arc<dyn QuorumVerifier>,
    pub arbiter: Arc<dyn Arbiter>,
}

pub struct KeyperChain {
    state: RwLock<ProtocolState>,
    collaborators: Collaborators,
    bus: Arc<InMemoryEventBus>,
}

type Transition<T> = ProtocolResult<(T, Vec<ProtocolEvent>)>;

impl KeyperChain {
    pub fn new(
        state: ProtocolState,
        collaborators: Collaborators,
        bus: Arc<InMemoryEventBus>,
    ) -> Self {
        info!(
            step = state.step,
            epochs = state.configs.epochs().len(),
            batches = state.batches.next_sequence(),
            cases = state.slasher.cases().len(),
            "KeyperChain initialized"
        );
        Self {
            state: RwLock::new(state),
            collaborators,
            bus,
        }
    }

    /// Stage `apply` on a copy of the state and commit it only on success.
    fn transact<T, F>(&self, operation: &'static str, apply: F) -> ProtocolResult<T>
    where
        F: FnOnce(&mut ProtocolState, &Collaborators) -> Transition<T>,
    {
        let mut state = self.state.write();
        let mut staged = state.clone();

        match apply(&mut staged, &self.collaborators) {
            Ok((value, events)) => {
                *state = staged;
                for event in events {
                    self.bus.publish(event);
                }
                Ok(value)
            }
            Err(e) => {
                warn!(operation, step = state.step, error = %e, "Operation rejected");
                Err(e)
            }
        }
    }

    fn read<R>(&self, query: impl FnOnce(&ProtocolState) -> R) -> R {
        query(&self.state.read())
    }

    // =========================================================================
    // STEP CLOCK
    // =========================================================================

    pub fn current_step(&self) -> Step {
        self.state.read().step
    }

    /// Move the clock forward by `steps`. Returns the new step.
    pub fn advance(&self, steps: Step) -> ProtocolResult<Step> {
        let current = self.current_step();
        let target = current
            .checked_add(steps)
            .ok_or(ProtocolError::StepRegression {
                current,
                requested: Step::MAX,
            })?;
        self.advance_to(target)
    }

    /// Move the clock to `step`. Staying put is allowed; going back is not.
    pub fn advance_to(&self, step: Step) -> ProtocolResult<Step> {
        let mut state = self.state.write();
        if step < state.step {
            return Err(ProtocolError::StepRegression {
                current: state.step,
                requested: step,
            });
        }
        if step > state.step {
            debug!(from = state.step, to = step, "Step advanced");
            state.step = step;
        }
        Ok(step)
    }

    // =========================================================================
    // CONFIG STORE
    // =========================================================================

    /// Schedule `config` to activate after the heads-up delay.
    ///
    /// Every keyper in `config` must already hold the minimum stake.
    pub fn schedule_config_change(
        &self,
        caller: &Address,
        config: BatchConfig,
    ) -> ProtocolResult<ConfigEpoch> {
        self.transact("schedule_config_change", |state, _| {
            if caller != state.configs.governance() {
                return Err(kc_01_config::ConfigError::Unauthorized { caller: *caller }.into());
            }
            for keyper in &config.keypers {
                let balance = state.deposits.balance_of(keyper);
                if balance < state.min_keyper_stake {
                    return Err(ProtocolError::InsufficientStake {
                        keyper: *keyper,
                        balance,
                        required: state.min_keyper_stake,
                    });
                }
            }

            let epoch = state
                .configs
                .schedule_change(caller, config, state.step)?
                .clone();
            let event = ProtocolEvent::ConfigScheduled {
                step: state.step,
                epoch: epoch.index,
                effective_from: epoch.effective_from,
                keypers: epoch.config.keypers.clone(),
                threshold: epoch.config.threshold,
            };
            Ok((epoch, vec![event]))
        })
    }

    /// Configuration active at `step`.
    pub fn active_config(&self, step: Step) -> ProtocolResult<ConfigEpoch> {
        self.read(|state| Ok(state.configs.active_config(step)?.clone()))
    }

    pub fn pending_config(&self) -> Option<ConfigEpoch> {
        self.read(|state| state.configs.pending_change(state.step).cloned())
    }

    // =========================================================================
    // DEPOSIT LEDGER
    // =========================================================================

    pub fn deposit(&self, owner: &Address, amount: Amount) -> ProtocolResult<Amount> {
        self.transact("deposit", |state, io| {
            let balance = state.deposits.deposit(owner, amount, io.ledger.as_ref())?;
            let event = ProtocolEvent::StakeDeposited {
                step: state.step,
                owner: *owner,
                amount,
                balance,
            };
            Ok((balance, vec![event]))
        })
    }

    /// Return stake to `owner`. A keyper of the active or the incoming
    /// configuration must keep at least `min_keyper_stake`.
    pub fn withdraw(&self, owner: &Address, amount: Amount) -> ProtocolResult<Amount> {
        self.transact("withdraw", |state, io| {
            let bond = KeyperBond::new(&state.configs, state.step, state.min_keyper_stake);
            let balance = state
                .deposits
                .withdraw(owner, amount, &bond, io.ledger.as_ref())?;
            let event = ProtocolEvent::StakeWithdrawn {
                step: state.step,
                owner: *owner,
                amount,
                balance,
            };
            Ok((balance, vec![event]))
        })
    }

    pub fn stake_of(&self, owner: &Address) -> Amount {
        self.read(|state| state.deposits.balance_of(owner))
    }

    pub fn is_locked(&self, owner: &Address) -> bool {
        self.read(|state| state.deposits.is_locked(owner))
    }

    // =========================================================================
    // FEE ESCROW
    // =========================================================================

    pub fn deposit_fee(&self, owner: &Address, amount: Amount) -> ProtocolResult<Amount> {
        self.transact("deposit_fee", |state, io| {
            let balance = state.fees.deposit_fee(owner, amount, io.ledger.as_ref())?;
            let event = ProtocolEvent::FeeDeposited {
                step: state.step,
                owner: *owner,
                amount,
                balance,
            };
            Ok((balance, vec![event]))
        })
    }

    pub fn withdraw_fee(&self, owner: &Address, amount: Amount) -> ProtocolResult<Amount> {
        self.transact("withdraw_fee", |state, io| {
            let balance = state.fees.withdraw_fee(owner, amount, io.ledger.as_ref())?;
            let event = ProtocolEvent::FeeWithdrawn {
                step: state.step,
                owner: *owner,
                amount,
                balance,
            };
            Ok((balance, vec![event]))
        })
    }

    /// Pay all collected fees to `recipient`. Governance only.
    pub fn release_fees(&self, caller: &Address, recipient: &Address) -> ProtocolResult<Amount> {
        self.transact("release_fees", |state, io| {
            if caller != state.configs.governance() {
                return Err(ProtocolError::Unauthorized { caller: *caller });
            }
            let amount = state
                .fees
                .release_collected(recipient, io.ledger.as_ref())?;
            let events = if amount > 0 {
                vec![ProtocolEvent::FeesReleased {
                    step: state.step,
                    recipient: *recipient,
                    amount,
                }]
            } else {
                Vec::new()
            };
            Ok((amount, events))
        })
    }

    pub fn fee_balance_of(&self, owner: &Address) -> Amount {
        self.read(|state| state.fees.balance_of(owner))
    }

    pub fn collected_fees(&self) -> Amount {
        self.read(|state| state.fees.collected())
    }

    // =========================================================================
    // BATCH REGISTRY / EXECUTOR
    // =========================================================================

    pub fn submit_batch(
        &self,
        submitter: &Address,
        payload: &[u8],
        fee: Amount,
    ) -> ProtocolResult<Batch> {
        self.transact("submit_batch", |state, _| {
            let batch = state
                .batches
                .submit_batch(
                    submitter,
                    payload,
                    fee,
                    &state.configs,
                    &mut state.fees,
                    state.step,
                )?
                .clone();
            let event = ProtocolEvent::BatchSubmitted {
                step: state.step,
                sequence: batch.sequence,
                payload_ref: batch.payload_ref,
                submitter: batch.submitter,
                fee: batch.fee_paid,
            };
            Ok((batch, vec![event]))
        })
    }

    pub fn execute_batch(
        &self,
        sequence: SequenceNumber,
        operations: Vec<Operation>,
        authorization: Vec<u8>,
        executor: &Address,
    ) -> ProtocolResult<ExecutedBatch> {
        self.transact("execute_batch", |state, io| {
            let receipt = Executor::new(io.verifier.as_ref(), io.target.as_ref()).execute_batch(
                &mut state.batches,
                &state.configs,
                sequence,
                operations,
                authorization,
                executor,
                state.step,
            )?;
            let event = ProtocolEvent::BatchExecuted {
                step: state.step,
                sequence,
                operations_hash: receipt.operations_hash,
                receipt_hash: receipt.receipt_hash,
                executor: *executor,
            };
            Ok((receipt, vec![event]))
        })
    }

    pub fn batch(&self, sequence: SequenceNumber) -> Option<Batch> {
        self.read(|state| state.batches.batch(sequence).cloned())
    }

    pub fn executed_batch(&self, sequence: SequenceNumber) -> Option<ExecutedBatch> {
        self.read(|state| state.batches.executed(sequence).cloned())
    }

    pub fn next_sequence(&self) -> SequenceNumber {
        self.read(|state| state.batches.next_sequence())
    }

    pub fn next_to_execute(&self) -> SequenceNumber {
        self.read(|state| state.batches.next_to_execute())
    }

    // =========================================================================
    // SLASHER
    // =========================================================================

    /// Open a case, or return the open case for the same tuple. Only a newly
    /// created case is announced.
    pub fn raise_case(
        &self,
        opener: &Address,
        accused: &Address,
        sequence: SequenceNumber,
        evidence: Hash,
    ) -> ProtocolResult<RaisedCase> {
        self.transact("raise_case", |state, _| {
            let raised = state.slasher.raise_case(
                opener,
                accused,
                sequence,
                evidence,
                &state.batches,
                &state.configs,
                &mut state.deposits,
                state.step,
            )?;
            let mut events = Vec::new();
            if raised.created {
                if let Some(case) = state.slasher.case(raised.case_id) {
                    events.push(ProtocolEvent::CaseRaised {
                        step: state.step,
                        case_id: case.id,
                        accused: case.accused,
                        sequence: case.sequence,
                        evidence: case.evidence,
                        opener: case.opener,
                        appeal_deadline: case.appeal_deadline,
                    });
                }
            }
            Ok((raised, events))
        })
    }

    pub fn appeal(
        &self,
        caller: &Address,
        case_id: CaseId,
        counter_evidence: Hash,
    ) -> ProtocolResult<()> {
        self.transact("appeal", |state, _| {
            state
                .slasher
                .appeal(caller, case_id, counter_evidence, state.step)?;
            let event = ProtocolEvent::CaseAppealed {
                step: state.step,
                case_id,
                counter_evidence,
            };
            Ok(((), vec![event]))
        })
    }

    /// Obtain and record the arbiter's verdict. Resolver only.
    pub fn resolve_appeal(&self, caller: &Address, case_id: CaseId) -> ProtocolResult<Verdict> {
        self.transact("resolve_appeal", |state, io| {
            let verdict = state
                .slasher
                .resolve_appeal(caller, case_id, io.arbiter.as_ref())?;
            let event = ProtocolEvent::VerdictRecorded {
                step: state.step,
                case_id,
                verdict,
            };
            Ok((verdict, vec![event]))
        })
    }

    /// Resolve a case whose appeal deadline has been reached. Anyone may call.
    pub fn finalize(&self, case_id: CaseId) -> ProtocolResult<CaseOutcome> {
        self.transact("finalize", |state, io| {
            let outcome =
                state
                    .slasher
                    .finalize(case_id, &mut state.deposits, io.ledger.as_ref(), state.step)?;

            let mut events = Vec::with_capacity(2);
            if outcome.slashed > 0 {
                events.push(ProtocolEvent::StakeSlashed {
                    step: state.step,
                    case_id,
                    owner: outcome.accused,
                    amount: outcome.slashed,
                    recipient: outcome.recipient,
                });
            }
            events.push(ProtocolEvent::CaseResolved {
                step: state.step,
                case_id,
                accused: outcome.accused,
                verdict: outcome.verdict,
                slashed: outcome.slashed,
            });
            Ok((outcome, events))
        })
    }

    pub fn case(&self, case_id: CaseId) -> Option<SlashingCase> {
        self.read(|state| state.slasher.case(case_id).cloned())
    }

    pub fn open_cases_against(&self, accused: &Address) -> Vec<SlashingCase> {
        self.read(|state| state.slasher.open_cases_against(accused).cloned().collect())
    }

    // =========================================================================
    // KEY BROADCAST
    // =========================================================================

    pub fn publish_key(
        &self,
        publisher: &Address,
        epoch_id: EpochId,
        key: Vec<u8>,
    ) -> ProtocolResult<KeyMaterial> {
        self.transact("publish_key", |state, _| {
            let material = state
                .keys
                .publish_key(publisher, epoch_id, key, &state.configs, state.step)?
                .clone();
            let event = ProtocolEvent::KeyPublished {
                step: state.step,
                epoch: epoch_id,
                publisher: *publisher,
                key: material.key.clone(),
            };
            Ok((material, vec![event]))
        })
    }

    pub fn key_for(&self, epoch_id: EpochId) -> Option<KeyMaterial> {
        self.read(|state| state.keys.key_for(epoch_id).cloned())
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    /// Subscribe to events committed from now on.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// A copy of the full committed state.
    pub fn snapshot(&self) -> ProtocolState {
        self.state.read().clone()
    }

    /// Deposit accounting holds: no negative balance, no more than came in.
    pub fn check_invariants(&self) -> bool {
        self.read(|state| {
            let ok = state.deposits.check_invariants();
            if !ok {
                warn!(
                    held = state.deposits.total_balance(),
                    inflow = state.deposits.total_inflow(),
                    "Deposit invariant violated"
                );
            }
            ok
        })
    }

    /// Short description of a committed event for log lines.
    pub fn describe(event: &ProtocolEvent) -> String {
        let record = event.to_record();
        let ids: Vec<String> = record
            .attributes
            .iter()
            .filter(|(key, _)| key != "step")
            .map(|(key, value)| match value.strip_prefix("0x") {
                Some(digits) if digits.len() > 8 && !digits.contains(',') => {
                    format!("{key}={}", &digits[..8])
                }
                _ => format!("{key}={value}"),
            })
            .collect();
        format!("{}@{} {}", record.kind, event.step(), ids.join(" "))
    }
}
