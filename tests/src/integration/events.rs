//! # Committed Event Stream
//!
//! Observers learn of state changes only through the bus: one event per
//! committed transition, none for rejected calls.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_bus::{EventFilter, EventRecord, EventTopic, ProtocolEvent};
    use shared_types::{Verdict, BURN_ADDRESS};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_case_lifecycle_events_in_order() {
        let net = TestNetwork::new();
        net.stake_all(300);
        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        let accused = net.keyper(1);
        let mut slasher = net
            .chain
            .subscribe(EventFilter::topics(vec![EventTopic::Slasher]));

        let raised = net
            .chain
            .raise_case(&WATCHER, &accused, sequence, [0xE1; 32])
            .unwrap();
        // Idempotent re-raise is not announced
        net.chain
            .raise_case(&WATCHER, &accused, sequence, [0xE1; 32])
            .unwrap();
        net.chain.appeal(&accused, raised.case_id, [0xC0; 32]).unwrap();
        net.arbiter.decide(raised.case_id, Verdict::Clear);
        net.chain.resolve_appeal(&RESOLVER, raised.case_id).unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        net.chain.finalize(raised.case_id).unwrap();

        let mut kinds = Vec::new();
        for _ in 0..4 {
            let event = timeout(Duration::from_secs(1), slasher.recv())
                .await
                .expect("event within timeout")
                .expect("bus open");
            kinds.push(event.kind());
        }
        assert_eq!(
            kinds,
            vec!["case_raised", "case_appealed", "verdict_recorded", "case_resolved"]
        );
        assert!(slasher.drain().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_calls_publish_nothing() {
        let net = TestNetwork::new();
        let mut all = net.chain.subscribe(EventFilter::all());

        assert!(net.chain.withdraw(&SUBMITTER, 1).is_err());
        assert!(net.chain.submit_batch(&SUBMITTER, b"x", 100).is_err());
        assert!(net.chain.finalize(0).is_err());
        assert!(net.chain.publish_key(&WATCHER, 0, vec![1]).is_err());

        assert!(timeout(Duration::from_millis(50), all.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_slash_reported_on_deposits_topic() {
        let net = TestNetwork::new();
        net.stake_all(250);
        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        let mut deposits = net
            .chain
            .subscribe(EventFilter::topics(vec![EventTopic::Deposits]));

        let raised = net
            .chain
            .raise_case(&WATCHER, &net.keyper(0), sequence, [0xE1; 32])
            .unwrap();
        net.chain.advance(APPEAL_WINDOW).unwrap();
        net.chain.finalize(raised.case_id).unwrap();

        let event = timeout(Duration::from_secs(1), deposits.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            ProtocolEvent::StakeSlashed {
                step: APPEAL_WINDOW,
                case_id: raised.case_id,
                owner: net.keyper(0),
                amount: 250,
                recipient: BURN_ADDRESS,
            }
        );
    }

    #[test]
    fn test_observer_decodes_records() {
        let net = TestNetwork::new();
        let mut batcher = net.chain.subscribe(EventFilter::topics(vec![
            EventTopic::Batcher,
            EventTopic::Executor,
        ]));

        let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
        let events = batcher.drain();
        assert_eq!(events.len(), 2);

        // What an indexer sees: flat attributes it can parse back
        let submitted: EventRecord = events[0].to_record();
        assert_eq!(submitted.kind, "batch_submitted");
        assert_eq!(submitted.get("sequence"), Some("0"));
        assert_eq!(
            submitted.get("fee"),
            Some(minimum_fee(b"payload").to_string().as_str())
        );

        let executed = net.chain.executed_batch(sequence).unwrap();
        let decoded = ProtocolEvent::try_from(events[1].to_record()).unwrap();
        match decoded {
            ProtocolEvent::BatchExecuted {
                receipt_hash,
                executor,
                ..
            } => {
                assert_eq!(receipt_hash, executed.receipt_hash);
                assert_eq!(executor, RELAYER);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_since_filter_skips_earlier_steps() {
        let net = TestNetwork::new();
        let mut late = net
            .chain
            .subscribe(EventFilter::topics(vec![EventTopic::FeeBank]).since(5));

        net.chain.deposit_fee(&SUBMITTER, 10).unwrap();
        net.chain.advance_to(5).unwrap();
        net.chain.deposit_fee(&SUBMITTER, 20).unwrap();

        let events = late.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step(), 5);
    }
}
