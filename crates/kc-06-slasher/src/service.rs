//! # Slasher Service
//!
//! Adjudicates misbehavior claims that reference an executed batch. A case
//! locks the accused's deposit while open; `finalize` either forfeits stake
//! through the DepositLedger or clears the case, and always releases the
//! lock it holds.
//!
//! Cases are keyed by the full `(accused, sequence, evidence)` tuple, so the
//! same keyper may face concurrent cases for different batches or evidence.

use crate::domain::{CaseOutcome, CaseState, RaisedCase, SlashPenalty, SlashingCase};
use crate::error::{SlasherError, SlasherResult};
use crate::ports::outbound::{Arbiter, ConfigQuery, ExecutedBatches};
use kc_02_deposits::DepositLedger;
use serde::{Deserialize, Serialize};
use shared_types::{
    short_hex, Address, CaseId, ComponentId, Hash, SequenceNumber, Step, TokenLedger, Verdict,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Fixed parameters of the adjudication process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlasherSettings {
    /// Steps between opening a case and its appeal deadline
    pub appeal_window: Step,
    /// Identity allowed to record arbitration verdicts
    pub resolver: Address,
    pub penalty: SlashPenalty,
    /// Receives slashed stake (burn address or claimant pool)
    pub recipient: Address,
}

type CaseKey = (Address, SequenceNumber, Hash);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slasher {
    settings: SlasherSettings,
    cases: Vec<SlashingCase>,
    index: BTreeMap<CaseKey, CaseId>,
}

impl Slasher {
    pub fn new(settings: SlasherSettings) -> Self {
        Self {
            settings,
            cases: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Open a case against `accused` for executed batch `sequence`.
    ///
    /// Raising an open tuple again returns the existing case.
    #[allow(clippy::too_many_arguments)]
    pub fn raise_case(
        &mut self,
        opener: &Address,
        accused: &Address,
        sequence: SequenceNumber,
        evidence: Hash,
        registry: &dyn ExecutedBatches,
        configs: &dyn ConfigQuery,
        deposits: &mut DepositLedger,
        now: Step,
    ) -> SlasherResult<RaisedCase> {
        let executed = registry
            .executed(sequence)
            .ok_or(SlasherError::UnknownBatch { sequence })?;
        let epoch = configs.active_config(executed.executed_at)?;
        if !epoch.config.is_keyper(accused) {
            return Err(SlasherError::NotAKeyper {
                accused: *accused,
                sequence,
            });
        }

        let key = (*accused, sequence, evidence);
        if let Some(&case_id) = self.index.get(&key) {
            let existing = self.get(case_id)?;
            if existing.is_open() {
                debug!(case_id, "[kc-06] Case already open for this evidence");
                return Ok(RaisedCase {
                    case_id,
                    created: false,
                });
            }
            return Err(SlasherError::DuplicateCase { case_id });
        }

        let case_id = self.cases.len() as CaseId;
        deposits.lock(ComponentId::Slasher, accused, case_id)?;

        let appeal_deadline = now.saturating_add(self.settings.appeal_window);
        self.cases.push(SlashingCase {
            id: case_id,
            accused: *accused,
            sequence,
            evidence,
            opener: *opener,
            opened_at: now,
            appeal_deadline,
            state: CaseState::Pending,
        });
        self.index.insert(key, case_id);

        info!(
            case_id,
            accused = %short_hex(accused),
            sequence,
            evidence = %short_hex(&evidence),
            appeal_deadline,
            "[kc-06] Slashing case raised"
        );
        Ok(RaisedCase {
            case_id,
            created: true,
        })
    }

    /// Contest a pending case. Only the accused, only before the deadline.
    pub fn appeal(
        &mut self,
        caller: &Address,
        case_id: CaseId,
        counter_evidence: Hash,
        now: Step,
    ) -> SlasherResult<()> {
        let case = self.get_mut(case_id)?;
        if *caller != case.accused {
            return Err(SlasherError::Unauthorized { caller: *caller });
        }
        match case.state {
            CaseState::Pending => {}
            CaseState::Appealed { .. } => return Err(SlasherError::AlreadyAppealed { case_id }),
            CaseState::ResolvedSlashed { .. } | CaseState::ResolvedCleared { .. } => {
                return Err(SlasherError::AlreadyResolved { case_id })
            }
        }
        if !case.appeal_window_open(now) {
            return Err(SlasherError::AppealWindowClosed {
                case_id,
                deadline: case.appeal_deadline,
            });
        }

        case.state = CaseState::Appealed {
            counter_evidence,
            appealed_at: now,
            verdict: None,
        };
        info!(case_id, counter_evidence = %short_hex(&counter_evidence), "[kc-06] Case appealed");
        Ok(())
    }

    /// Ask the arbiter for a verdict on an appealed case and record it.
    pub fn resolve_appeal(
        &mut self,
        caller: &Address,
        case_id: CaseId,
        arbiter: &dyn Arbiter,
    ) -> SlasherResult<Verdict> {
        if *caller != self.settings.resolver {
            return Err(SlasherError::Unauthorized { caller: *caller });
        }
        let case = self.get(case_id)?;
        let counter_evidence = match &case.state {
            CaseState::Pending => return Err(SlasherError::NotAppealed { case_id }),
            CaseState::Appealed {
                verdict: Some(_), ..
            } => return Err(SlasherError::VerdictAlreadyRecorded { case_id }),
            CaseState::Appealed {
                counter_evidence,
                verdict: None,
                ..
            } => *counter_evidence,
            CaseState::ResolvedSlashed { .. } | CaseState::ResolvedCleared { .. } => {
                return Err(SlasherError::AlreadyResolved { case_id })
            }
        };

        let decision = arbiter.arbitrate(case, &counter_evidence);

        if let CaseState::Appealed { verdict, .. } = &mut self.get_mut(case_id)?.state {
            *verdict = Some(decision);
        }
        info!(case_id, verdict = decision.as_str(), "[kc-06] Arbitration verdict recorded");
        Ok(decision)
    }

    /// Resolve a case whose appeal deadline has passed.
    ///
    /// Unappealed cases are slashed; appealed cases apply the recorded
    /// verdict. The accused's lock for this case is released either way.
    pub fn finalize(
        &mut self,
        case_id: CaseId,
        deposits: &mut DepositLedger,
        ledger: &dyn TokenLedger,
        now: Step,
    ) -> SlasherResult<CaseOutcome> {
        let case = self.get(case_id)?;
        if case.state.is_terminal() {
            return Err(SlasherError::AlreadyResolved { case_id });
        }
        if case.appeal_window_open(now) {
            return Err(SlasherError::NotYetExpired {
                case_id,
                deadline: case.appeal_deadline,
            });
        }
        let verdict = match case.state {
            CaseState::Appealed { verdict: None, .. } => {
                return Err(SlasherError::ArbitrationPending { case_id })
            }
            CaseState::Appealed {
                verdict: Some(verdict),
                ..
            } => verdict,
            _ => Verdict::Slash,
        };
        let accused = case.accused;
        let recipient = self.settings.recipient;

        let (slashed, state) = match verdict {
            Verdict::Slash => {
                let amount = self.settings.penalty.amount_for(deposits.balance_of(&accused));
                deposits.slash(ComponentId::Slasher, &accused, amount, &recipient, ledger)?;
                (
                    amount,
                    CaseState::ResolvedSlashed {
                        amount,
                        resolved_at: now,
                    },
                )
            }
            Verdict::Clear => (0, CaseState::ResolvedCleared { resolved_at: now }),
        };
        deposits.unlock(ComponentId::Slasher, &accused, case_id)?;
        self.get_mut(case_id)?.state = state;

        info!(
            case_id,
            accused = %short_hex(&accused),
            verdict = verdict.as_str(),
            slashed,
            "[kc-06] Slashing case finalized"
        );
        Ok(CaseOutcome {
            case_id,
            accused,
            verdict,
            slashed,
            recipient,
        })
    }

    pub fn case(&self, case_id: CaseId) -> Option<&SlashingCase> {
        usize::try_from(case_id)
            .ok()
            .and_then(|i| self.cases.get(i))
    }

    pub fn cases(&self) -> &[SlashingCase] {
        &self.cases
    }

    /// Case recorded for an exact tuple, open or resolved.
    pub fn find(
        &self,
        accused: &Address,
        sequence: SequenceNumber,
        evidence: &Hash,
    ) -> Option<&SlashingCase> {
        self.index
            .get(&(*accused, sequence, *evidence))
            .and_then(|&id| self.case(id))
    }

    pub fn open_cases_against<'a>(
        &'a self,
        accused: &'a Address,
    ) -> impl Iterator<Item = &'a SlashingCase> + 'a {
        self.cases
            .iter()
            .filter(move |case| case.accused == *accused && case.is_open())
    }

    pub fn settings(&self) -> &SlasherSettings {
        &self.settings
    }

    fn get(&self, case_id: CaseId) -> SlasherResult<&SlashingCase> {
        self.case(case_id)
            .ok_or(SlasherError::UnknownCase { case_id })
    }

    fn get_mut(&mut self, case_id: CaseId) -> SlasherResult<&mut SlashingCase> {
        usize::try_from(case_id)
            .ok()
            .and_then(|i| self.cases.get_mut(i))
            .ok_or(SlasherError::UnknownCase { case_id })
    }
}
