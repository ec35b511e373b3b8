//! # Batch Submission and Execution
//!
//! Sequence numbers are assigned 0, 1, 2, ... with no gaps, and each batch
//! executes exactly once, in order, under a quorum of the keyper set active
//! at execution time.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_04_batcher::BatcherError;
    use kc_05_executor::{
        authorization_message, operations_hash, sign_authorization, ExecutorError,
    };
    use keyper_node::{ErrorKind, ProtocolError};
    use rand::{Rng, RngCore};
    use shared_crypto::{keccak256, KeyperKeyPair};

    #[test]
    fn test_sequences_are_gapless() {
        let net = TestNetwork::new();
        let sequences: Vec<u64> = [&b"a"[..], b"bb", b"ccc"]
            .iter()
            .map(|payload| net.submit(payload))
            .collect();

        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(net.chain.next_sequence(), 3);
        assert_eq!(net.chain.batch(1).unwrap().payload_ref, keccak256(b"bb"));
    }

    #[test]
    fn test_payload_reference_commits_to_payload() {
        let net = TestNetwork::new();
        let mut rng = rand::thread_rng();
        for _ in 0..8 {
            let mut payload = vec![0u8; rng.gen_range(1..=256)];
            rng.fill_bytes(&mut payload);

            let sequence = net.submit(&payload);
            let batch = net.chain.batch(sequence).unwrap();
            assert_eq!(batch.payload_ref, keccak256(&payload));
            assert_eq!(batch.payload_len, payload.len() as u64);
            assert_eq!(batch.submitter, SUBMITTER);
        }
        assert_eq!(net.chain.next_sequence(), 8);
    }

    #[test]
    fn test_out_of_order_execution_rejected() {
        let net = TestNetwork::new();
        for payload in [&b"a"[..], b"b", b"c"] {
            net.submit(payload);
        }
        net.execute(0, vec![b"x".to_vec()]).unwrap();

        assert_eq!(
            net.execute(2, vec![b"z".to_vec()]),
            Err(ProtocolError::Executor(ExecutorError::StaleSequence {
                expected: 1,
                got: 2
            }))
        );
        assert!(net.chain.executed_batch(2).is_none());

        net.execute(1, vec![b"y".to_vec()]).unwrap();
        net.execute(2, vec![b"z".to_vec()]).unwrap();
        assert_eq!(net.chain.next_to_execute(), 3);
    }

    #[test]
    fn test_double_execution_rejected() {
        let net = TestNetwork::new();
        net.submit(b"payload");
        net.execute(0, vec![b"op".to_vec()]).unwrap();

        let err = net.execute(0, vec![b"op".to_vec()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleSequence);
        assert_eq!(net.target.applied_count(), 1);
    }

    #[test]
    fn test_execute_without_submission() {
        let net = TestNetwork::new();
        assert_eq!(
            net.chain.execute_batch(0, vec![], vec![], &RELAYER),
            Err(ProtocolError::Executor(ExecutorError::UnknownBatch { sequence: 0 }))
        );
    }

    #[test]
    fn test_fee_below_schedule_rejected() {
        let net = TestNetwork::new();
        let payload = b"0123456789";
        net.chain.deposit_fee(&SUBMITTER, 100).unwrap();

        let required = minimum_fee(payload);
        assert_eq!(
            net.chain
                .submit_batch(&SUBMITTER, payload, required - 1)
                .map(|b| b.sequence),
            Err(ProtocolError::Batcher(BatcherError::FeeTooLow {
                offered: required - 1,
                required
            }))
        );
        assert_eq!(net.chain.fee_balance_of(&SUBMITTER), 100);
        assert_eq!(net.chain.next_sequence(), 0);

        // Overpaying is accepted and the whole fee is consumed
        let batch = net
            .chain
            .submit_batch(&SUBMITTER, payload, required + 5)
            .unwrap();
        assert_eq!(batch.fee_paid, required + 5);
        assert_eq!(net.chain.fee_balance_of(&SUBMITTER), 100 - required - 5);
        assert_eq!(net.chain.collected_fees(), required + 5);
    }

    #[test]
    fn test_unfunded_submission_rejected() {
        let net = TestNetwork::new();
        let err = net
            .chain
            .submit_batch(&SUBMITTER, b"payload", 50)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        assert_eq!(net.chain.next_sequence(), 0);
    }

    #[test]
    fn test_payload_limits() {
        let net = TestNetwork::new();
        net.chain.deposit_fee(&SUBMITTER, 10_000).unwrap();

        assert_eq!(
            net.chain.submit_batch(&SUBMITTER, b"", 100).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        let oversized = vec![0u8; 1025];
        assert_eq!(
            net.chain
                .submit_batch(&SUBMITTER, &oversized, 5_000)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_quorum_requires_distinct_keypers() {
        let net = TestNetwork::new();
        net.submit(b"payload");
        let ops = vec![b"op".to_vec()];

        let single = net.authorize(0, &ops, &[2]);
        let repeated = net.authorize(0, &ops, &[1, 1]);
        for authorization in [single, repeated, vec![0xFF; 7]] {
            assert_eq!(
                net.chain
                    .execute_batch(0, ops.clone(), authorization, &RELAYER),
                Err(ProtocolError::Executor(ExecutorError::QuorumNotMet { sequence: 0 }))
            );
        }

        let outsider = KeyperKeyPair::from_bytes([0x42; 32]).unwrap();
        let batch = net.chain.batch(0).unwrap();
        let message = authorization_message(0, &batch.payload_ref, &operations_hash(&ops));
        let mixed = sign_authorization(&[&net.keypers[0], &outsider], &message).unwrap();
        assert_eq!(
            net.chain
                .execute_batch(0, ops.clone(), mixed, &RELAYER)
                .unwrap_err()
                .kind(),
            ErrorKind::QuorumNotMet
        );

        let quorum = net.authorize(0, &ops, &[2, 0]);
        assert!(net.chain.execute_batch(0, ops, quorum, &RELAYER).is_ok());
    }

    #[test]
    fn test_authorization_binds_operations() {
        let net = TestNetwork::new();
        net.submit(b"payload");

        let signed_for = vec![b"transfer 10".to_vec()];
        let authorization = net.authorize(0, &signed_for, &[0, 1]);
        let err = net
            .chain
            .execute_batch(0, vec![b"transfer 99".to_vec()], authorization, &RELAYER)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QuorumNotMet);
    }

    #[test]
    fn test_target_failure_aborts_whole_batch() {
        let net = TestNetwork::new();
        net.target.reject_operation(b"revert".to_vec());
        net.submit(b"payload");

        let err = net
            .execute(0, vec![b"a".to_vec(), b"b".to_vec(), b"revert".to_vec()])
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Executor(ExecutorError::TargetExecutionFailed {
                sequence: 0,
                index: 2,
                reason: "operation rejected by target".into()
            })
        );
        assert_eq!(net.target.applied_count(), 0);
        assert_eq!(net.chain.next_to_execute(), 0);

        // The same sequence can be retried with corrected operations
        net.execute(0, vec![b"a".to_vec(), b"b".to_vec()]).unwrap();
        assert_eq!(net.target.applied_count(), 2);
    }

    #[test]
    fn test_receipt_records_operations() {
        let net = TestNetwork::new();
        net.chain.advance_to(4).unwrap();
        net.submit(b"payload");
        let ops = vec![b"first".to_vec(), b"second".to_vec()];

        let receipt = net.execute(0, ops.clone()).unwrap();
        assert_eq!(receipt.executed_at, 4);
        assert_eq!(receipt.operations_hash, operations_hash(&ops));
        assert_eq!(receipt.executor, RELAYER);
        assert_eq!(net.chain.executed_batch(0), Some(receipt));
        assert_eq!(
            net.target.applied(),
            vec![(0, b"first".to_vec()), (0, b"second".to_vec())]
        );
    }

    #[test]
    fn test_quorum_follows_active_keyper_set() {
        let net = TestNetwork::new();
        let newcomers = keyper_keys(4..=6);
        for key in &newcomers {
            net.ledger.mint(&key.address(), MIN_STAKE);
            net.chain.deposit(&key.address(), MIN_STAKE).unwrap();
        }
        net.chain
            .schedule_config_change(&GOVERNANCE, batch_config(&newcomers, 2))
            .unwrap();
        net.submit(b"payload");
        let ops = vec![b"op".to_vec()];

        net.chain.advance_to(HEADS_UP_DELAY).unwrap();
        let old_quorum = net.authorize(0, &ops, &[0, 1]);
        assert_eq!(
            net.chain
                .execute_batch(0, ops.clone(), old_quorum, &RELAYER)
                .unwrap_err()
                .kind(),
            ErrorKind::QuorumNotMet
        );

        let batch = net.chain.batch(0).unwrap();
        let message = authorization_message(0, &batch.payload_ref, &operations_hash(&ops));
        let new_quorum = sign_authorization(&[&newcomers[1], &newcomers[2]], &message).unwrap();
        assert!(net
            .chain
            .execute_batch(0, ops, new_quorum, &RELAYER)
            .is_ok());
    }
}
