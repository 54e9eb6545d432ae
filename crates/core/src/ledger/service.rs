//! Ledger engine: group balances, settlements and per-user views.
//!
//! The engine is read-only. It pulls a consistent set of expenses and
//! memberships from an [`ExpenseStore`], folds them into balances and plans
//! the transfers that settle them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::LedgerConfig;
use splitledger_shared::types::money::round_amount;
use splitledger_shared::types::{GroupId, UserId};
use tracing::{debug, warn};

use super::balance::{Balance, BalanceAggregator, UNKNOWN_MEMBER_NAME};
use super::error::LedgerError;
use super::settlement::{Settlement, SettlementPlanner};
use super::store::ExpenseStore;
use super::types::{ExpenseCategory, ExpenseFilter};

/// Balances and settlement plan for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLedger {
    /// The group.
    pub group_id: GroupId,
    /// The group's display name, if known.
    pub group_name: Option<String>,
    /// Per-participant balances in order of first reference.
    pub balances: Vec<Balance>,
    /// Transfers that settle the group.
    pub settlements: Vec<Settlement>,
}

/// The settlements of one group that involve a particular user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettlements {
    /// The group.
    pub group_id: GroupId,
    /// The group's display name, if known.
    pub group_name: Option<String>,
    /// Settlements where the user pays or receives.
    pub settlements: Vec<Settlement>,
}

/// A user's position and spending over a set of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Paid, owed and net over the matching expenses.
    pub balance: Balance,
    /// Amount the user paid per category.
    pub category_breakdown: BTreeMap<ExpenseCategory, Decimal>,
    /// Number of matching expenses.
    pub expense_count: usize,
}

/// Computes ledgers from an expense store.
#[derive(Debug, Clone)]
pub struct LedgerEngine<S> {
    store: S,
    aggregator: BalanceAggregator,
    planner: SettlementPlanner,
    tolerance: Decimal,
    decimal_places: u32,
}

impl<S: ExpenseStore> LedgerEngine<S> {
    /// Creates an engine with default ledger settings.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &LedgerConfig::default())
    }

    /// Creates an engine with the given ledger settings.
    pub fn with_config(store: S, config: &LedgerConfig) -> Self {
        Self {
            store,
            aggregator: BalanceAggregator::new(config),
            planner: SettlementPlanner::new(config),
            tolerance: config.tolerance,
            decimal_places: config.decimal_places,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Computes balances and settlements for a group.
    ///
    /// # Errors
    ///
    /// Returns `GroupNotFound` or `Store` when the expenses cannot be
    /// fetched, and `NegativeAmount` if a stored expense is negative.
    pub fn compute_group_ledger(&self, group_id: GroupId) -> Result<GroupLedger, LedgerError> {
        let expenses = self.store.group_expenses(group_id)?;
        let sheet = self.aggregator.aggregate(&expenses, &self.store)?;

        let drift = sheet.total_net();
        let allowed = self.tolerance * Decimal::from(expenses.len());
        if drift.abs() > allowed {
            warn!(%group_id, %drift, %allowed, "group balances do not sum to zero");
        }

        let balances = sheet.into_balances();
        let settlements = self.planner.plan(&balances);

        debug!(
            %group_id,
            expenses = expenses.len(),
            participants = balances.len(),
            settlements = settlements.len(),
            "computed group ledger"
        );

        Ok(GroupLedger {
            group_id,
            group_name: self.store.group_name(group_id),
            balances,
            settlements,
        })
    }

    /// Lists, for every group the user belongs to, the settlements that
    /// involve the user.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while computing any group ledger.
    pub fn compute_user_overview(&self, user_id: UserId) -> Result<Vec<GroupSettlements>, LedgerError> {
        self.store
            .groups_for_user(user_id)?
            .into_iter()
            .map(|group_id| {
                let ledger = self.compute_group_ledger(group_id)?;
                Ok(GroupSettlements {
                    group_id,
                    group_name: ledger.group_name,
                    settlements: ledger
                        .settlements
                        .into_iter()
                        .filter(|s| s.involves(user_id))
                        .collect(),
                })
            })
            .collect()
    }

    /// Computes a user's balance across all their groups and personal
    /// expenses.
    ///
    /// A user with no expenses gets a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the expenses cannot be fetched and
    /// `NegativeAmount` if one of them is negative.
    pub fn compute_user_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        self.compute_user_summary(user_id, &ExpenseFilter::all())
            .map(|summary| summary.balance)
    }

    /// Summarizes the user's expenses matching `filter`: balance, amounts
    /// paid per category and the number of expenses.
    ///
    /// Every category seen in the matching expenses appears in the
    /// breakdown, at zero if the user paid nothing in it.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LedgerEngine::compute_user_balance`].
    pub fn compute_user_summary(
        &self,
        user_id: UserId,
        filter: &ExpenseFilter,
    ) -> Result<UserSummary, LedgerError> {
        let expenses = self.store.user_expenses(user_id, filter)?;
        let mut sheet = self.aggregator.aggregate(&expenses, &self.store)?;

        if sheet.get(user_id).is_none() {
            debug!(%user_id, ?filter, "user has no matching expenses");
        }

        let mut category_breakdown: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
        for expense in &expenses {
            let paid = category_breakdown.entry(expense.category).or_default();
            if expense.paid_by == user_id {
                *paid += expense.amount;
            }
        }
        for amount in category_breakdown.values_mut() {
            *amount = round_amount(*amount, self.decimal_places);
        }

        let balance = sheet
            .entry(user_id, || {
                self.store
                    .display_name(user_id)
                    .unwrap_or_else(|| UNKNOWN_MEMBER_NAME.to_string())
            })
            .clone();

        Ok(UserSummary {
            balance,
            category_breakdown,
            expense_count: expenses.len(),
        })
    }
}
