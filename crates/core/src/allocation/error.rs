//! Allocation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when an allocation precondition is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The amount to allocate is negative.
    #[error("Cannot allocate a negative amount: {0}")]
    NegativeAmount(Decimal),

    /// There is nobody to allocate to.
    #[error("Allocation requires at least one participant")]
    NoParticipants,

    /// Percentage weights are negative or all zero.
    #[error("Allocation weights must be non-negative and not all zero")]
    InvalidWeights,

    /// The amount does not fit in 64-bit minor units.
    #[error("Amount {0} is out of range for minor-unit arithmetic")]
    AmountOutOfRange(Decimal),
}
