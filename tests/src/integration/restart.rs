//! # Restart from Snapshot
//!
//! A node stopped mid-case resumes with the case, its lock and the batch
//! log intact. The adapter snapshot carries token custody and registered
//! verdicts across a restart that rebuilds the adapters.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_05_executor::EcdsaQuorumVerifier;
    use keyper_node::adapters::{GovernanceArbiter, InMemoryTarget, InMemoryTokenLedger};
    use keyper_node::{
        adapters_path, load_adapters, load_snapshot, save_adapters, save_snapshot,
        AdapterSnapshot, Collaborators, ErrorKind, KeyperChain,
    };
    use shared_bus::InMemoryEventBus;
    use shared_types::{Verdict, BURN_ADDRESS};
    use std::sync::Arc;

    fn restart(net: &TestNetwork, dir: &tempfile::TempDir) -> KeyperChain {
        let path = dir.path().join("state").join("keyper-chain.snapshot");
        save_snapshot(&net.chain.snapshot(), &path).unwrap();
        let state = load_snapshot(&path).unwrap();

        // Token custody lives in the external ledger, which outlives the node
        let collaborators = Collaborators {
            ledger: net.ledger.clone(),
            target: net.target.clone(),
            verifier: Arc::new(EcdsaQuorumVerifier::new()),
            arbiter: net.arbiter.clone(),
        };
        KeyperChain::new(state, collaborators, Arc::new(InMemoryEventBus::new()))
    }

    #[test]
    fn test_open_case_survives_restart() {
        let net = TestNetwork::new();
        net.stake_all(300);
        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        let accused = net.keyper(1);
        net.chain.advance_to(4).unwrap();
        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xC4; 32])
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let restored = restart(&net, &dir);

        assert_eq!(restored.current_step(), 4);
        assert_eq!(restored.next_sequence(), net.chain.next_sequence());
        assert!(restored.is_locked(&accused));
        assert_eq!(
            restored.withdraw(&accused, 1).unwrap_err().kind(),
            ErrorKind::Locked
        );

        restored.advance_to(14).unwrap();
        let outcome = restored.finalize(raised.case_id).unwrap();
        assert_eq!(outcome.verdict, Verdict::Slash);
        assert_eq!(outcome.slashed, 300);
        assert_eq!(net.ledger.balance_of(&BURN_ADDRESS), 300);
        assert!(restored.check_invariants());
    }

    #[test]
    fn test_restored_chain_keeps_executing_in_order() {
        let net = TestNetwork::new();
        let first = net.executed_batch(b"one", vec![b"a".to_vec()]);
        let pending = net.submit(b"two");

        let dir = tempfile::tempdir().unwrap();
        let restored = restart(&net, &dir);
        assert_eq!(restored.next_to_execute(), pending);
        assert!(restored.executed_batch(first).is_some());

        let operations = vec![b"b".to_vec()];
        let authorization = net.authorize(pending, &operations, &[0, 2]);
        restored
            .execute_batch(pending, operations, authorization, &RELAYER)
            .unwrap();
        assert_eq!(net.target.applied_count(), 2);
    }

    #[test]
    fn test_custody_and_verdicts_survive_rebuilt_adapters() {
        let net = TestNetwork::new();
        net.stake_all(300);
        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        let accused = net.keyper(0);
        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xC4; 32])
            .unwrap();
        net.chain.appeal(&accused, raised.case_id, [0xC0; 32]).unwrap();
        net.arbiter.decide(raised.case_id, Verdict::Slash);
        let custody = net.ledger.custody();
        assert!(custody >= 900);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyper-chain.snapshot");
        save_snapshot(&net.chain.snapshot(), &path).unwrap();
        let adapters = AdapterSnapshot {
            balances: net.ledger.balances(),
            decisions: net.arbiter.decisions(),
        };
        save_adapters(&adapters, &adapters_path(&path)).unwrap();

        let restored = load_adapters(&adapters_path(&path)).unwrap();
        let ledger = Arc::new(InMemoryTokenLedger::from_balances(restored.balances));
        let arbiter = Arc::new(GovernanceArbiter::with_decisions(restored.decisions));
        let chain = KeyperChain::new(
            load_snapshot(&path).unwrap(),
            Collaborators {
                ledger: ledger.clone(),
                target: Arc::new(InMemoryTarget::new()),
                verifier: Arc::new(EcdsaQuorumVerifier::new()),
                arbiter,
            },
            Arc::new(InMemoryEventBus::new()),
        );
        assert_eq!(ledger.custody(), custody);

        chain.advance(APPEAL_WINDOW).unwrap();
        assert_eq!(
            chain.resolve_appeal(&RESOLVER, raised.case_id).unwrap(),
            Verdict::Slash
        );
        let outcome = chain.finalize(raised.case_id).unwrap();
        assert_eq!(outcome.slashed, 300);
        assert_eq!(ledger.balance_of(&BURN_ADDRESS), 300);
        assert_eq!(ledger.custody(), custody - 300);

        // A keyper that was not accused can still draw its unbonded stake
        let other = net.keyper(1);
        assert_eq!(chain.withdraw(&other, 300 - MIN_STAKE).unwrap(), MIN_STAKE);
        assert!(chain.check_invariants());
    }
}
