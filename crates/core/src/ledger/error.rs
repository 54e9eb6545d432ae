//! Ledger error types.
//!
//! Only contract violations, input validation failures and store failures
//! are errors. Membership resolution problems are recovered inside the
//! aggregator and never surface here.

use rust_decimal::Decimal;
use splitledger_shared::types::GroupId;
use thiserror::Error;

use crate::allocation::AllocationError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Contract Violations ==========
    /// Expense amount is negative.
    #[error("Expense amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Allocation precondition violated.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    // ========== Validation Errors ==========
    /// Split amounts do not add up to the expense total.
    #[error("Split amounts must equal total amount. Expected: {expected}, got: {actual}")]
    SplitSumMismatch {
        /// The expense total.
        expected: Decimal,
        /// The sum of the split amounts.
        actual: Decimal,
    },

    // ========== Store Errors ==========
    /// Group not found in the expense store.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// The expense store failed.
    #[error("Expense store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::Allocation(_) => "ALLOCATION_ERROR",
            Self::SplitSumMismatch { .. } => "SPLIT_SUM_MISMATCH",
            Self::GroupNotFound(_) => "GROUP_NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NegativeAmount(_) | Self::SplitSumMismatch { .. } => 400,

            // 404 Not Found
            Self::GroupNotFound(_) => 404,

            // 500 Internal Server Error
            Self::Allocation(_) | Self::Store(_) => 500,
        }
    }
}
