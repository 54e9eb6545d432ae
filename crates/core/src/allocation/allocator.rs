//! Cent-exact split allocation.
//!
//! Every allocation is computed in integer minor units (cents at two decimal
//! places) and only converted back to `Decimal` at the end, so the shares
//! always sum exactly to the rounded total:
//! 1. Convert the total to minor units
//! 2. Give every recipient the floor of its exact share
//! 3. Hand out the leftover units one at a time

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use splitledger_shared::types::UserId;
use splitledger_shared::types::money::{from_minor_units, to_minor_units};

use super::error::AllocationError;
use crate::ledger::types::Split;

/// Allocator for dividing an expense total between participants.
///
/// Guarantees:
/// - Sum of allocations EXACTLY equals the total rounded to `decimal_places`
/// - Equal shares differ by at most one minor unit
/// - Leftover units go to earlier-listed participants
#[derive(Debug, Clone, Copy)]
pub struct SplitAllocator {
    decimal_places: u32,
}

impl SplitAllocator {
    /// Creates an allocator for amounts with the given number of decimal places.
    #[must_use]
    pub const fn new(decimal_places: u32) -> Self {
        Self { decimal_places }
    }

    /// Returns the decimal places this allocator rounds to.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Splits `total` equally across `participants`, in list order.
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is negative, `participants` is empty, or
    /// the total does not fit in 64-bit minor units.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitledger_core::allocation::SplitAllocator;
    /// use splitledger_shared::types::UserId;
    ///
    /// let people = [UserId::from_u128(1), UserId::from_u128(2), UserId::from_u128(3)];
    /// let splits = SplitAllocator::new(2).allocate(dec!(100), &people).unwrap();
    /// let amounts: Vec<_> = splits.iter().map(|s| s.amount).collect();
    /// assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    /// ```
    pub fn allocate(
        &self,
        total: Decimal,
        participants: &[UserId],
    ) -> Result<Vec<Split>, AllocationError> {
        if participants.is_empty() {
            return Err(AllocationError::NoParticipants);
        }

        let amounts = self.allocate_equal(total, participants.len())?;

        Ok(participants
            .iter()
            .zip(amounts)
            .map(|(user_id, amount)| Split::new(*user_id, amount))
            .collect())
    }

    /// Splits `total` into `count` equal decimal shares.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SplitAllocator::allocate`].
    pub fn allocate_equal(&self, total: Decimal, count: usize) -> Result<Vec<Decimal>, AllocationError> {
        if total.is_sign_negative() && !total.is_zero() {
            return Err(AllocationError::NegativeAmount(total));
        }
        if count == 0 {
            return Err(AllocationError::NoParticipants);
        }

        let units = to_minor_units(total, self.decimal_places)
            .ok_or(AllocationError::AmountOutOfRange(total))?;

        Ok(Self::allocate_minor_units(units, count)
            .into_iter()
            .map(|share| from_minor_units(share, self.decimal_places))
            .collect())
    }

    /// Distributes `units` minor units over `count` recipients.
    ///
    /// The first `units % count` recipients receive one extra unit.
    /// Returns an empty vector when `count` is zero.
    #[must_use]
    pub fn allocate_minor_units(units: i64, count: usize) -> Vec<i64> {
        let Ok(divisor) = i64::try_from(count) else {
            return vec![];
        };
        if divisor == 0 {
            return vec![];
        }

        let base = units.div_euclid(divisor);
        let remainder = units - base * divisor;

        (0..divisor)
            .map(|i| if i < remainder { base + 1 } else { base })
            .collect()
    }

    /// Splits `total` proportionally to `percentages` using the Largest
    /// Remainder Method.
    ///
    /// Percentages are treated as weights, so they need not sum to exactly
    /// 100. Leftover units go to the largest fractional parts; ties keep list
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is negative, the list is empty, any weight
    /// is negative, or all weights are zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitledger_core::allocation::SplitAllocator;
    ///
    /// let result = SplitAllocator::new(2)
    ///     .allocate_by_percentages(dec!(100), &[dec!(50), dec!(30), dec!(20)])
    ///     .unwrap();
    /// assert_eq!(result, vec![dec!(50), dec!(30), dec!(20)]);
    /// ```
    pub fn allocate_by_percentages(
        &self,
        total: Decimal,
        percentages: &[Decimal],
    ) -> Result<Vec<Decimal>, AllocationError> {
        if total.is_sign_negative() && !total.is_zero() {
            return Err(AllocationError::NegativeAmount(total));
        }
        if percentages.is_empty() {
            return Err(AllocationError::NoParticipants);
        }
        if percentages.iter().any(|p| p.is_sign_negative() && !p.is_zero()) {
            return Err(AllocationError::InvalidWeights);
        }

        let weight_sum: Decimal = percentages.iter().copied().sum();
        if weight_sum.is_zero() {
            return Err(AllocationError::InvalidWeights);
        }

        let units = to_minor_units(total, self.decimal_places)
            .ok_or(AllocationError::AmountOutOfRange(total))?;
        let units_dec = Decimal::from(units);

        // Exact shares and their floors, in minor units
        let exact: Vec<Decimal> = percentages
            .iter()
            .map(|p| units_dec * *p / weight_sum)
            .collect();
        let mut floored: Vec<i64> = exact
            .iter()
            .map(|e| e.floor().to_i64().unwrap_or(0))
            .collect();

        let leftover = units - floored.iter().sum::<i64>();
        let leftover = usize::try_from(leftover).unwrap_or(0);

        if leftover > 0 {
            let mut fractions: Vec<(usize, Decimal)> = exact
                .iter()
                .zip(floored.iter())
                .enumerate()
                .map(|(i, (e, f))| (i, *e - Decimal::from(*f)))
                .collect();

            // Stable sort: equal fractions keep list order
            fractions.sort_by(|a, b| b.1.cmp(&a.1));

            for (idx, _) in fractions.iter().take(leftover) {
                floored[*idx] += 1;
            }
        }

        Ok(floored
            .into_iter()
            .map(|share| from_minor_units(share, self.decimal_places))
            .collect())
    }
}

impl Default for SplitAllocator {
    fn default() -> Self {
        Self::new(splitledger_shared::types::DEFAULT_DECIMAL_PLACES)
    }
}
