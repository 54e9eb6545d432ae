//! Property-based tests for balance aggregation.
//!
//! - Zero-sum: nets of a group add up to zero within one cent per expense
//! - Determinism: identical input yields identical balances in identical order

use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger_shared::types::{GroupId, UserId};

use super::balance::BalanceAggregator;
use super::store::InMemoryExpenseStore;
use super::types::{Expense, Split, SplitMode};
use crate::allocation::SplitAllocator;

/// How an expense is split in a generated scenario.
#[derive(Debug, Clone)]
enum SplitShape {
    /// No stored splits; derived from group membership.
    Derived,
    /// Stored splits weighted by the given values.
    Weighted(Vec<u32>),
}

/// A generated expense: cents, payer index, split shape.
type ExpenseSpec = (i64, usize, SplitShape);

/// Strategy to generate amounts in cents (0.00 to 10,000.00).
fn amount_cents() -> impl Strategy<Value = i64> {
    0i64..1_000_000i64
}

fn split_shape(members: usize) -> impl Strategy<Value = SplitShape> {
    prop_oneof![
        Just(SplitShape::Derived),
        prop::collection::vec(0u32..100, members)
            .prop_filter("at least one non-zero weight", |w| w.iter().any(|v| *v > 0))
            .prop_map(SplitShape::Weighted),
    ]
}

/// Strategy to generate a member count and expenses for that group.
fn scenario() -> impl Strategy<Value = (usize, Vec<ExpenseSpec>)> {
    (1usize..8).prop_flat_map(|members| {
        let expense = (amount_cents(), 0..members, split_shape(members));
        (Just(members), prop::collection::vec(expense, 0..20))
    })
}

fn group() -> GroupId {
    GroupId::from_u128(1)
}

fn build(members: usize, specs: &[ExpenseSpec]) -> (InMemoryExpenseStore, Vec<Expense>) {
    let ids: Vec<UserId> = (0..members).map(|i| UserId::from_u128(i as u128 + 10)).collect();

    let mut store = InMemoryExpenseStore::new();
    for (i, id) in ids.iter().enumerate() {
        store = store.with_user(*id, format!("member-{i}"));
    }
    store = store.with_group(group(), "Group", ids.clone());

    let allocator = SplitAllocator::new(2);
    let expenses = specs
        .iter()
        .map(|(cents, payer, shape)| {
            let amount = Decimal::new(*cents, 2);
            let expense = Expense::new(amount, ids[*payer]).in_group(group());
            match shape {
                SplitShape::Derived => expense,
                SplitShape::Weighted(weights) => {
                    let weights: Vec<Decimal> = weights.iter().map(|w| Decimal::from(*w)).collect();
                    let shares = allocator.allocate_by_percentages(amount, &weights).unwrap();
                    let splits = ids
                        .iter()
                        .zip(shares)
                        .map(|(id, share)| Split::new(*id, share))
                        .collect();
                    expense.with_splits(SplitMode::Custom, splits)
                }
            }
        })
        .collect();

    (store, expenses)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sum of nets stays within one cent per expense of zero.
    #[test]
    fn prop_balances_sum_to_zero((members, specs) in scenario()) {
        let (store, expenses) = build(members, &specs);

        let sheet = BalanceAggregator::default().aggregate(&expenses, &store).unwrap();

        let bound = Decimal::new(1, 2) * Decimal::from(expenses.len());
        prop_assert!(
            sheet.total_net().abs() <= bound,
            "total net {} exceeds {}", sheet.total_net(), bound
        );
    }

    /// Paid minus owed equals net for every participant.
    #[test]
    fn prop_net_is_paid_minus_owed((members, specs) in scenario()) {
        let (store, expenses) = build(members, &specs);

        let sheet = BalanceAggregator::default().aggregate(&expenses, &store).unwrap();

        for balance in sheet.iter() {
            prop_assert_eq!(balance.net, balance.paid - balance.owed);
        }
    }

    /// Aggregation is deterministic, including participant order.
    #[test]
    fn prop_aggregation_is_deterministic((members, specs) in scenario()) {
        let (store, expenses) = build(members, &specs);
        let aggregator = BalanceAggregator::default();

        let first = aggregator.aggregate(&expenses, &store).unwrap().into_balances();
        let second = aggregator.aggregate(&expenses, &store).unwrap().into_balances();
        prop_assert_eq!(first, second);
    }
}
