//! Property-based tests for split allocation.
//!
//! - Allocation exactness: shares always sum to the rounded total
//! - Fairness: equal shares differ by at most one minor unit

use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger_shared::types::UserId;
use splitledger_shared::types::money::round_amount;

use super::allocator::SplitAllocator;

/// Strategy to generate non-negative amounts (0.000 to 1,000,000.000).
///
/// Three decimal places so that the pre-allocation rounding is exercised.
fn non_negative_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|mills| Decimal::new(mills, 3))
}

/// Strategy to generate participant counts (1 to 50).
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..50
}

/// Strategy to generate percentage weights.
fn weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0u32..10_000).prop_map(|v| Decimal::new(i64::from(v), 2)), 1..10)
        .prop_filter("at least one non-zero weight", |w| w.iter().any(|d| !d.is_zero()))
}

fn participants(count: usize) -> Vec<UserId> {
    (0..count).map(|i| UserId::from_u128(i as u128 + 1)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Shares sum exactly to round(total, 2).
    #[test]
    fn prop_allocation_is_exact(
        total in non_negative_amount(),
        count in participant_count(),
    ) {
        let splits = SplitAllocator::new(2).allocate(total, &participants(count)).unwrap();
        let sum: Decimal = splits.iter().map(|s| s.amount).sum();
        prop_assert_eq!(sum, round_amount(total, 2));
    }

    /// Max share minus min share never exceeds one cent.
    #[test]
    fn prop_allocation_is_fair(
        total in non_negative_amount(),
        count in participant_count(),
    ) {
        let splits = SplitAllocator::new(2).allocate(total, &participants(count)).unwrap();
        let max = splits.iter().map(|s| s.amount).max().unwrap();
        let min = splits.iter().map(|s| s.amount).min().unwrap();
        prop_assert!(max - min <= Decimal::new(1, 2), "spread {} too large", max - min);
    }

    /// Larger shares always come first.
    #[test]
    fn prop_allocation_extra_cents_go_first(
        total in non_negative_amount(),
        count in participant_count(),
    ) {
        let splits = SplitAllocator::new(2).allocate(total, &participants(count)).unwrap();
        for pair in splits.windows(2) {
            prop_assert!(pair[0].amount >= pair[1].amount);
        }
    }

    /// One share per participant, same order as the input.
    #[test]
    fn prop_allocation_preserves_participants(
        total in non_negative_amount(),
        count in participant_count(),
    ) {
        let input = participants(count);
        let splits = SplitAllocator::new(2).allocate(total, &input).unwrap();
        let ids: Vec<UserId> = splits.iter().map(|s| s.user_id).collect();
        prop_assert_eq!(ids, input);
    }

    /// Percentage allocation also preserves the rounded total.
    #[test]
    fn prop_percentage_allocation_is_exact(
        total in non_negative_amount(),
        weights in weights(),
    ) {
        let shares = SplitAllocator::new(2).allocate_by_percentages(total, &weights).unwrap();
        prop_assert_eq!(shares.len(), weights.len());
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), round_amount(total, 2));
    }

    /// Allocation is deterministic.
    #[test]
    fn prop_allocation_is_deterministic(
        total in non_negative_amount(),
        count in participant_count(),
    ) {
        let input = participants(count);
        let allocator = SplitAllocator::new(2);
        prop_assert_eq!(
            allocator.allocate(total, &input).unwrap(),
            allocator.allocate(total, &input).unwrap()
        );
    }
}
