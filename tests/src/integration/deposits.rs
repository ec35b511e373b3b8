//! # Stake and Fee Accounting
//!
//! Balances move only through deposit, withdraw and slash (stake) or
//! deposit-fee, withdraw-fee and spend-fee (escrow), and the protocol never
//! holds more stake than came in.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use keyper_node::{ErrorKind, ProtocolError};
    use kc_02_deposits::DepositError;
    use proptest::prelude::*;
    use shared_types::{Amount, LedgerError};

    #[test]
    fn test_deposit_and_withdraw_move_tokens() {
        let net = TestNetwork::new();
        let keyper = net.keyper(0);

        assert_eq!(net.chain.deposit(&keyper, 400).unwrap(), 400);
        assert_eq!(net.ledger.balance_of(&keyper), FUNDING - 400);
        assert_eq!(net.ledger.custody(), 400);

        assert_eq!(net.chain.withdraw(&keyper, 150).unwrap(), 250);
        assert_eq!(net.chain.stake_of(&keyper), 250);
        assert_eq!(net.ledger.balance_of(&keyper), FUNDING - 250);
    }

    #[test]
    fn test_withdraw_more_than_balance() {
        let net = TestNetwork::new();
        let keyper = net.keyper(1);
        net.chain.deposit(&keyper, 10).unwrap();

        assert_eq!(
            net.chain.withdraw(&keyper, 11),
            Err(ProtocolError::Deposit(DepositError::InsufficientBalance {
                owner: keyper,
                balance: 10,
                requested: 11
            }))
        );
        assert_eq!(net.chain.stake_of(&keyper), 10);
    }

    #[test]
    fn test_failed_pull_changes_nothing() {
        let net = TestNetwork::new();
        let poor = [0x99; 20];

        let err = net.chain.deposit(&poor, 5).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Deposit(DepositError::TransferFailed(
                LedgerError::InsufficientFunds {
                    account: poor,
                    available: 0,
                    required: 5
                }
            ))
        );
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(net.chain.stake_of(&poor), 0);
        assert!(net.chain.check_invariants());
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let net = TestNetwork::new();
        assert_eq!(
            net.chain.deposit(&SUBMITTER, 0).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            net.chain.deposit_fee(&SUBMITTER, 0).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_fee_escrow_is_separate_from_stake() {
        let net = TestNetwork::new();
        net.chain.deposit(&SUBMITTER, 70).unwrap();
        net.chain.deposit_fee(&SUBMITTER, 30).unwrap();

        assert_eq!(net.chain.stake_of(&SUBMITTER), 70);
        assert_eq!(net.chain.fee_balance_of(&SUBMITTER), 30);
        assert_eq!(
            net.chain.withdraw_fee(&SUBMITTER, 31).unwrap_err().kind(),
            ErrorKind::InsufficientBalance
        );
        assert_eq!(net.chain.withdraw_fee(&SUBMITTER, 30).unwrap(), 0);
        assert_eq!(net.ledger.custody(), 70);
    }

    #[derive(Debug, Clone)]
    enum StakeOp {
        Deposit(usize, Amount),
        Withdraw(usize, Amount),
        /// Raise an unappealed case and let it finalize.
        Slash(usize),
    }

    fn stake_op() -> impl Strategy<Value = StakeOp> {
        prop_oneof![
            (0usize..3, 0u128..500).prop_map(|(who, amount)| StakeOp::Deposit(who, amount)),
            (0usize..3, 0u128..500).prop_map(|(who, amount)| StakeOp::Withdraw(who, amount)),
            (0usize..3).prop_map(StakeOp::Slash),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_stake_never_exceeds_inflow(ops in prop::collection::vec(stake_op(), 1..24)) {
            let net = TestNetwork::new();
            let sequence = net.executed_batch(b"payload", vec![b"op".to_vec()]);
            let mut evidence = 0u8;

            for op in ops {
                match op {
                    StakeOp::Deposit(who, amount) => {
                        let _ = net.chain.deposit(&net.keyper(who), amount);
                    }
                    StakeOp::Withdraw(who, amount) => {
                        // Genesis keypers are bonded for the minimum stake
                        if let Ok(remaining) = net.chain.withdraw(&net.keyper(who), amount) {
                            prop_assert!(remaining >= MIN_STAKE);
                        }
                    }
                    StakeOp::Slash(who) => {
                        evidence = evidence.wrapping_add(1);
                        let raised = net
                            .chain
                            .raise_case(&WATCHER, &net.keyper(who), sequence, [evidence; 32])
                            .unwrap();
                        net.chain.advance(APPEAL_WINDOW).unwrap();
                        net.chain.finalize(raised.case_id).unwrap();
                    }
                }

                let state = net.chain.snapshot();
                prop_assert!(net.chain.check_invariants());
                prop_assert!(state.deposits.total_balance() <= state.deposits.total_inflow());
                prop_assert!(state.deposits.total_balance() <= net.ledger.custody());
            }
        }
    }
}
