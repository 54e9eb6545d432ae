//! Property-based tests for settlement planning.
//!
//! - Correctness: applying the plan brings every net within one cent of zero
//! - Count bound: at most creditors + debtors - 1 transfers
//! - Determinism: identical balances yield identical plans

use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger_shared::types::UserId;

use super::balance::Balance;
use super::settlement::{SettlementPlanner, apply_settlements};

/// Strategy to generate zero-sum nets in cents for 1 to 12 participants.
fn zero_sum_nets() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-500_000i64..500_000i64, 0..11).prop_map(|mut nets| {
        let closing = -nets.iter().sum::<i64>();
        nets.push(closing);
        nets
    })
}

fn balances(nets: &[i64]) -> Vec<Balance> {
    nets.iter()
        .enumerate()
        .map(|(i, cents)| {
            let mut balance = Balance::new(UserId::from_u128(i as u128 + 1), format!("p{i}"));
            let amount = Decimal::new(*cents, 2);
            if amount.is_sign_negative() {
                balance.add_owed(-amount);
            } else {
                balance.add_paid(amount);
            }
            balance
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every participant ends within tolerance of zero.
    #[test]
    fn prop_settlements_zero_every_net(nets in zero_sum_nets()) {
        let balances = balances(&nets);
        let settlements = SettlementPlanner::default().plan(&balances);

        for (user_id, net) in apply_settlements(&balances, &settlements) {
            prop_assert!(net.abs() < Decimal::new(1, 2), "{} left with {}", user_id, net);
        }
    }

    /// The sweep never needs more than creditors + debtors - 1 transfers.
    #[test]
    fn prop_settlement_count_is_bounded(nets in zero_sum_nets()) {
        let balances = balances(&nets);
        let settlements = SettlementPlanner::default().plan(&balances);

        let creditors = balances.iter().filter(|b| b.is_creditor()).count();
        let debtors = balances.iter().filter(|b| b.is_debtor()).count();
        if creditors == 0 || debtors == 0 {
            prop_assert!(settlements.is_empty());
        } else {
            prop_assert!(settlements.len() < creditors + debtors);
        }
    }

    /// Every transfer is positive and flows from a debtor to a creditor.
    #[test]
    fn prop_settlements_flow_from_debtors_to_creditors(nets in zero_sum_nets()) {
        let balances = balances(&nets);
        let settlements = SettlementPlanner::default().plan(&balances);

        for settlement in &settlements {
            prop_assert!(settlement.amount > Decimal::ZERO);
            let from = balances.iter().find(|b| b.user_id == settlement.from).unwrap();
            let to = balances.iter().find(|b| b.user_id == settlement.to).unwrap();
            prop_assert!(from.is_debtor());
            prop_assert!(to.is_creditor());
        }
    }

    /// Planning is deterministic.
    #[test]
    fn prop_planning_is_deterministic(nets in zero_sum_nets()) {
        let balances = balances(&nets);
        let planner = SettlementPlanner::default();
        prop_assert_eq!(planner.plan(&balances), planner.plan(&balances));
    }
}
