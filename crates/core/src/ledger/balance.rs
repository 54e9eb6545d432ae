//! Participant balance aggregation.
//!
//! Folds a set of expenses into one net position per participant:
//! - the payer's `paid` grows by the expense amount
//! - every split participant's `owed` grows by their share
//! - `net = paid - owed`, rounded to the ledger's decimal places

use std::borrow::Cow;
use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::LedgerConfig;
use splitledger_shared::types::UserId;
use splitledger_shared::types::money::round_amount;
use tracing::debug;

use super::error::LedgerError;
use super::store::MemberResolver;
use super::types::{Expense, Split};
use crate::allocation::SplitAllocator;

/// Display name used for payers nobody could name.
pub const UNKNOWN_PAYER_NAME: &str = "Unknown";
/// Display name used for split participants nobody could name.
pub const UNKNOWN_MEMBER_NAME: &str = "Member";

/// A participant's net position across a set of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The participant.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Total paid by this participant.
    pub paid: Decimal,
    /// Total of this participant's shares.
    pub owed: Decimal,
    /// `paid - owed`. Positive means others owe this participant.
    pub net: Decimal,
}

impl Balance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            paid: Decimal::ZERO,
            owed: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    /// Adds an amount this participant paid.
    pub fn add_paid(&mut self, amount: Decimal) {
        self.paid += amount;
        self.net = self.paid - self.owed;
    }

    /// Adds a share this participant owes.
    pub fn add_owed(&mut self, amount: Decimal) {
        self.owed += amount;
        self.net = self.paid - self.owed;
    }

    /// True if the participant is owed money.
    #[must_use]
    pub fn is_creditor(&self) -> bool {
        self.net > Decimal::ZERO
    }

    /// True if the participant owes money.
    #[must_use]
    pub fn is_debtor(&self) -> bool {
        self.net < Decimal::ZERO
    }
}

/// Balances keyed by participant, iterated in order of first reference.
#[derive(Debug, Clone, Default)]
pub struct BalanceSheet {
    balances: HashMap<UserId, Balance>,
    order: Vec<UserId>,
}

impl BalanceSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the participant's balance, creating it on first reference.
    ///
    /// `name` is only evaluated when the balance is created.
    pub fn entry(&mut self, user_id: UserId, name: impl FnOnce() -> String) -> &mut Balance {
        if !self.balances.contains_key(&user_id) {
            self.order.push(user_id);
        }
        self.balances
            .entry(user_id)
            .or_insert_with(|| Balance::new(user_id, name()))
    }

    /// Looks up a participant.
    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<&Balance> {
        self.balances.get(&user_id)
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nobody has been referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates balances in order of first reference.
    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.order.iter().filter_map(|id| self.balances.get(id))
    }

    /// Sum of every participant's net.
    #[must_use]
    pub fn total_net(&self) -> Decimal {
        self.iter().map(|b| b.net).sum()
    }

    /// Consumes the sheet, returning balances in order of first reference.
    #[must_use]
    pub fn into_balances(mut self) -> Vec<Balance> {
        self.order
            .iter()
            .filter_map(|id| self.balances.remove(id))
            .collect()
    }
}

/// Folds expenses into per-participant balances.
#[derive(Debug, Clone, Copy)]
pub struct BalanceAggregator {
    allocator: SplitAllocator,
}

impl BalanceAggregator {
    /// Creates an aggregator from ledger settings.
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            allocator: SplitAllocator::new(config.decimal_places),
        }
    }

    /// Aggregates `expenses` into a balance sheet.
    ///
    /// Expenses without stored splits are split equally over their group's
    /// members. When membership cannot be resolved, or resolves to nobody,
    /// the payer is treated as the only participant, so the expense nets to
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NegativeAmount` if an expense amount is negative.
    pub fn aggregate<R>(&self, expenses: &[Expense], resolver: &R) -> Result<BalanceSheet, LedgerError>
    where
        R: MemberResolver + ?Sized,
    {
        let mut sheet = BalanceSheet::new();

        for expense in expenses {
            if expense.amount < Decimal::ZERO {
                return Err(LedgerError::NegativeAmount(expense.amount));
            }

            sheet
                .entry(expense.paid_by, || {
                    resolver
                        .display_name(expense.paid_by)
                        .unwrap_or_else(|| UNKNOWN_PAYER_NAME.to_string())
                })
                .add_paid(expense.amount);

            let (splits, names) = self.splits_for(expense, resolver)?;

            for split in splits.iter() {
                sheet
                    .entry(split.user_id, || {
                        names
                            .get(&split.user_id)
                            .cloned()
                            .or_else(|| resolver.display_name(split.user_id))
                            .unwrap_or_else(|| UNKNOWN_MEMBER_NAME.to_string())
                    })
                    .add_owed(split.amount);
            }
        }

        for balance in sheet.balances.values_mut() {
            balance.net = round_amount(balance.net, self.allocator.decimal_places());
        }

        Ok(sheet)
    }

    /// Picks the splits to apply for one expense, with any member names
    /// learned while resolving them.
    fn splits_for<'e, R>(
        &self,
        expense: &'e Expense,
        resolver: &R,
    ) -> Result<(Cow<'e, [Split]>, HashMap<UserId, String>), LedgerError>
    where
        R: MemberResolver + ?Sized,
    {
        if expense.has_splits() {
            return Ok((Cow::Borrowed(expense.splits.as_slice()), HashMap::new()));
        }

        let resolution = expense.group_id.map(|group_id| resolver.resolve_members(group_id));

        if let Some(members) = resolution.as_ref().and_then(|r| r.usable_members()) {
            let ids: Vec<UserId> = members.iter().map(|m| m.id).collect();
            let splits = self.allocator.allocate(expense.amount, &ids)?;
            let names: HashMap<UserId, String> =
                members.iter().map(|m| (m.id, m.name.clone())).collect();
            return Ok((Cow::Owned(splits), names));
        }

        debug!(
            expense_id = %expense.id,
            group_id = ?expense.group_id,
            "no resolvable members, payer covers the whole expense"
        );
        Ok((
            Cow::Owned(vec![Split::new(expense.paid_by, expense.amount)]),
            HashMap::new(),
        ))
    }
}

impl Default for BalanceAggregator {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}
