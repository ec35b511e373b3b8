//! # Slashing with Appeal
//!
//! ```text
//! raise ──→ Pending ──(deadline)──→ finalize ──→ ResolvedSlashed
//!              │
//!              └─ appeal ──→ Appealed ──resolve──→ finalize ──→ Slashed | Cleared
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_02_deposits::DepositError;
    use kc_06_slasher::{CaseState, SlashPenalty, SlasherError};
    use keyper_node::{ErrorKind, ProtocolError};
    use shared_types::{ComponentId, Verdict, BURN_ADDRESS};

    const STAKE: u128 = 500;
    const EVIDENCE: [u8; 32] = [0xE1; 32];

    /// Network with staked keypers and one executed batch.
    fn setup() -> (TestNetwork, u64) {
        let net = TestNetwork::new();
        net.stake_all(STAKE);
        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        (net, sequence)
    }

    #[test]
    fn test_unappealed_case_slashes_at_deadline() {
        let (net, sequence) = setup();
        let accused = net.keyper(2);
        let opened_at = 5;
        net.chain.advance_to(opened_at).unwrap();

        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        assert!(raised.created);
        let case = net.chain.case(raised.case_id).unwrap();
        assert_eq!(case.appeal_deadline, opened_at + 10);
        assert_eq!(case.state, CaseState::Pending);

        net.chain.advance_to(opened_at + 9).unwrap();
        assert_eq!(
            net.chain.finalize(raised.case_id),
            Err(ProtocolError::Slasher(SlasherError::NotYetExpired {
                case_id: raised.case_id,
                deadline: opened_at + 10
            }))
        );
        assert_eq!(net.chain.stake_of(&accused), STAKE);

        net.chain.advance_to(opened_at + 10).unwrap();
        let outcome = net.chain.finalize(raised.case_id).unwrap();
        assert_eq!(outcome.verdict, Verdict::Slash);
        assert_eq!(outcome.slashed, STAKE);
        assert_eq!(net.chain.stake_of(&accused), 0);
        assert_eq!(net.ledger.balance_of(&BURN_ADDRESS), STAKE);
        assert!(matches!(
            net.chain.case(raised.case_id).unwrap().state,
            CaseState::ResolvedSlashed {
                amount: STAKE,
                resolved_at: 15
            }
        ));
        assert!(!net.chain.is_locked(&accused));
        assert!(net.chain.check_invariants());
    }

    #[test]
    fn test_duplicate_raise_yields_one_case() {
        let (net, sequence) = setup();
        let accused = net.keyper(0);

        let first = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        net.chain.advance(3).unwrap();
        let second = net
            .chain
            .raise_case(&RELAYER, &accused, sequence, EVIDENCE)
            .unwrap();

        assert_eq!(first.case_id, second.case_id);
        assert!(!second.created);
        assert_eq!(net.chain.open_cases_against(&accused).len(), 1);
        // The deadline is not extended by the second raise
        assert_eq!(net.chain.case(first.case_id).unwrap().appeal_deadline, 10);
    }

    #[test]
    fn test_concurrent_cases_for_distinct_evidence() {
        let (net, sequence) = setup();
        let accused = net.keyper(0);
        let other = net.executed_batch(b"second", vec![b"op".to_vec()]);

        let a = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        let b = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xE2; 32])
            .unwrap();
        let c = net
            .chain
            .raise_case(&WATCHER, &accused, other, EVIDENCE)
            .unwrap();

        assert_eq!((a.case_id, b.case_id, c.case_id), (0, 1, 2));
        assert_eq!(net.chain.open_cases_against(&accused).len(), 3);
    }

    #[test]
    fn test_withdraw_locked_until_every_case_terminal() {
        let (net, sequence) = setup();
        let accused = net.keyper(1);
        let a = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        let b = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xE2; 32])
            .unwrap();

        assert_eq!(
            net.chain.withdraw(&accused, 1),
            Err(ProtocolError::Deposit(DepositError::Locked {
                owner: accused,
                cases: vec![a.case_id, b.case_id]
            }))
        );

        // Both appealed; the arbiter clears both
        net.chain.appeal(&accused, a.case_id, [0xC0; 32]).unwrap();
        net.chain.appeal(&accused, b.case_id, [0xC1; 32]).unwrap();
        net.chain.resolve_appeal(&RESOLVER, a.case_id).unwrap();
        net.chain.resolve_appeal(&RESOLVER, b.case_id).unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();

        net.chain.finalize(a.case_id).unwrap();
        assert_eq!(
            net.chain.withdraw(&accused, 1).unwrap_err().kind(),
            ErrorKind::Locked
        );

        net.chain.finalize(b.case_id).unwrap();
        assert_eq!(
            net.chain.withdraw(&accused, STAKE - MIN_STAKE).unwrap(),
            MIN_STAKE
        );
    }

    #[test]
    fn test_appeal_upheld_slashes() {
        let (net, sequence) = setup();
        let accused = net.keyper(0);
        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();

        net.chain.appeal(&accused, raised.case_id, [0xC0; 32]).unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        assert_eq!(
            net.chain.finalize(raised.case_id).unwrap_err(),
            ProtocolError::Slasher(SlasherError::ArbitrationPending {
                case_id: raised.case_id
            })
        );

        net.arbiter.decide(raised.case_id, Verdict::Slash);
        assert_eq!(
            net.chain.resolve_appeal(&RESOLVER, raised.case_id).unwrap(),
            Verdict::Slash
        );
        let outcome = net.chain.finalize(raised.case_id).unwrap();
        assert_eq!(outcome.slashed, STAKE);
        assert_eq!(net.chain.stake_of(&accused), 0);
    }

    #[test]
    fn test_appeal_rules() {
        let (net, sequence) = setup();
        let accused = net.keyper(0);
        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();

        // Only the accused
        assert_eq!(
            net.chain
                .appeal(&WATCHER, raised.case_id, [0; 32])
                .unwrap_err()
                .kind(),
            ErrorKind::Unauthorized
        );
        // Only before the deadline
        net.chain.advance_to(10).unwrap();
        assert_eq!(
            net.chain.appeal(&accused, raised.case_id, [0; 32]),
            Err(ProtocolError::Slasher(SlasherError::AppealWindowClosed {
                case_id: raised.case_id,
                deadline: 10
            }))
        );
        // Nothing to resolve on an unappealed case
        assert_eq!(
            net.chain.resolve_appeal(&RESOLVER, raised.case_id),
            Err(ProtocolError::Slasher(SlasherError::NotAppealed {
                case_id: raised.case_id
            }))
        );
    }

    #[test]
    fn test_resolver_only_and_once() {
        let (net, sequence) = setup();
        let accused = net.keyper(0);
        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        net.chain.appeal(&accused, raised.case_id, [0xC0; 32]).unwrap();

        assert_eq!(
            net.chain
                .resolve_appeal(&GOVERNANCE, raised.case_id)
                .unwrap_err()
                .kind(),
            ErrorKind::Unauthorized
        );
        net.chain.resolve_appeal(&RESOLVER, raised.case_id).unwrap();
        assert_eq!(
            net.chain.resolve_appeal(&RESOLVER, raised.case_id),
            Err(ProtocolError::Slasher(SlasherError::VerdictAlreadyRecorded {
                case_id: raised.case_id
            }))
        );
    }

    #[test]
    fn test_terminal_cases_accept_nothing() {
        let (net, sequence) = setup();
        let accused = net.keyper(0);
        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        net.chain.finalize(raised.case_id).unwrap();

        assert_eq!(
            net.chain.finalize(raised.case_id).unwrap_err().kind(),
            ErrorKind::AlreadyResolved
        );
        assert_eq!(
            net.chain
                .appeal(&accused, raised.case_id, [0; 32])
                .unwrap_err()
                .kind(),
            ErrorKind::AlreadyResolved
        );
        assert_eq!(
            net.chain
                .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
                .unwrap_err()
                .kind(),
            ErrorKind::DuplicateCase
        );
    }

    #[test]
    fn test_case_requires_executed_batch_and_keyper() {
        let (net, sequence) = setup();
        let pending = net.submit(b"not yet executed");

        assert_eq!(
            net.chain
                .raise_case(&WATCHER, &net.keyper(0), pending, EVIDENCE)
                .unwrap_err(),
            ProtocolError::Slasher(SlasherError::UnknownBatch { sequence: pending })
        );
        assert_eq!(
            net.chain
                .raise_case(&WATCHER, &SUBMITTER, sequence, EVIDENCE)
                .unwrap_err(),
            ProtocolError::Slasher(SlasherError::NotAKeyper {
                accused: SUBMITTER,
                sequence
            })
        );
        assert!(!net.chain.is_locked(&SUBMITTER));
    }

    #[test]
    fn test_fixed_penalty_is_capped() {
        let net = TestNetwork::with_penalty(SlashPenalty::Fixed(200));
        net.stake_all(STAKE);
        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        let accused = net.keyper(0);

        let first = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, EVIDENCE)
            .unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        assert_eq!(net.chain.finalize(first.case_id).unwrap().slashed, 200);
        assert_eq!(net.chain.stake_of(&accused), STAKE - 200);

        let second = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xE2; 32])
            .unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        net.chain.finalize(second.case_id).unwrap();

        let third = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xE3; 32])
            .unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        assert_eq!(net.chain.finalize(third.case_id).unwrap().slashed, 100);
        assert_eq!(net.chain.stake_of(&accused), 0);
    }

    #[test]
    fn test_only_slasher_may_slash() {
        let (net, _) = setup();
        let mut state = net.chain.snapshot();
        let ledger = net.ledger.as_ref();

        for caller in [ComponentId::Executor, ComponentId::BatchRegistry, ComponentId::FeeEscrow] {
            assert!(matches!(
                state
                    .deposits
                    .slash(caller, &net.keyper(0), 1, &WATCHER, ledger),
                Err(DepositError::Unauthorized(_))
            ));
        }
        assert_eq!(state.deposits.balance_of(&net.keyper(0)), STAKE);
        assert_eq!(net.ledger.balance_of(&WATCHER), FUNDING);
    }
}
