//! Expense-sharing ledger.
//!
//! This module implements the settlement pipeline:
//! - Domain types for expenses, splits and group membership
//! - The expense store boundary and an in-memory snapshot store
//! - Balance aggregation per participant
//! - Greedy settlement planning
//! - Split validation for new expenses
//! - The ledger engine tying it together

pub mod balance;
pub mod error;
pub mod service;
pub mod settlement;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod settlement_props;

pub use balance::{Balance, BalanceAggregator, BalanceSheet, UNKNOWN_MEMBER_NAME, UNKNOWN_PAYER_NAME};
pub use error::LedgerError;
pub use service::{GroupLedger, GroupSettlements, LedgerEngine, UserSummary};
pub use settlement::{Settlement, SettlementPlanner, apply_settlements};
pub use store::{ExpenseStore, GroupRecord, InMemoryExpenseStore, MemberResolver, Snapshot, UserRecord};
pub use types::{
    Expense, ExpenseCategory, ExpenseFilter, Member, MemberResolution, Split, SplitMode,
};
pub use validation::{prepare_splits, validate_splits};
