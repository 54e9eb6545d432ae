//! Split validation and preparation for new or edited expenses.
//!
//! These rules run in the caller before an expense is stored. The engine
//! itself assumes stored splits already satisfy them.

use rust_decimal::Decimal;
use splitledger_shared::LedgerConfig;
use splitledger_shared::types::UserId;

use super::error::LedgerError;
use super::types::{MemberResolution, Split, SplitMode};
use crate::allocation::SplitAllocator;

/// Checks that `splits` add up to `amount` within `tolerance`.
///
/// An empty split list is accepted: its splits are derived later.
///
/// # Errors
///
/// Returns `NegativeAmount` for a negative total and `SplitSumMismatch`
/// when the split sum is off by more than the tolerance.
pub fn validate_splits(amount: Decimal, splits: &[Split], tolerance: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(amount));
    }
    if splits.is_empty() {
        return Ok(());
    }

    let actual: Decimal = splits.iter().map(|s| s.amount).sum();
    if (actual - amount).abs() > tolerance {
        return Err(LedgerError::SplitSumMismatch {
            expected: amount,
            actual,
        });
    }

    Ok(())
}

/// Produces the splits to store with a new expense.
///
/// 1. Custom splits carrying only percentages get amounts derived from them
/// 2. Explicit splits are validated and kept
/// 3. Without splits, the amount is divided equally over the group members
/// 4. Without splits or members, the payer owes the whole amount
///
/// # Errors
///
/// Returns an error if the amount is negative, the splits do not add up,
/// or the percentages cannot be used as weights.
pub fn prepare_splits(
    amount: Decimal,
    payer: UserId,
    split_mode: SplitMode,
    splits: Vec<Split>,
    members: &MemberResolution,
    config: &LedgerConfig,
) -> Result<Vec<Split>, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(amount));
    }

    let allocator = SplitAllocator::new(config.decimal_places);

    if !splits.is_empty() {
        let splits = if split_mode == SplitMode::Custom && needs_percentage_amounts(&splits) {
            apply_percentages(&allocator, amount, splits)?
        } else {
            splits
        };
        validate_splits(amount, &splits, config.tolerance)?;
        return Ok(splits);
    }

    match members.usable_members() {
        Some(members) => {
            let ids: Vec<UserId> = members.iter().map(|m| m.id).collect();
            Ok(allocator.allocate(amount, &ids)?)
        }
        None => Ok(vec![Split::new(payer, amount)]),
    }
}

/// Every split has a percentage and no amount.
fn needs_percentage_amounts(splits: &[Split]) -> bool {
    splits
        .iter()
        .all(|s| s.amount.is_zero() && s.percentage.is_some())
}

fn apply_percentages(
    allocator: &SplitAllocator,
    amount: Decimal,
    splits: Vec<Split>,
) -> Result<Vec<Split>, LedgerError> {
    let percentages: Vec<Decimal> = splits
        .iter()
        .map(|s| s.percentage.unwrap_or(Decimal::ZERO))
        .collect();
    let amounts = allocator.allocate_by_percentages(amount, &percentages)?;

    Ok(splits
        .into_iter()
        .zip(amounts)
        .map(|(split, share)| Split { amount: share, ..split })
        .collect())
}
