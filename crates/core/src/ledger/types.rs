//! Expense domain types consumed by the settlement engine.
//!
//! Expenses and their splits are owned by the surrounding system; the
//! engine only reads them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::money::deserialize_lenient_amount;
use splitledger_shared::types::{ExpenseId, GroupId, UserId};

/// How an expense's total was divided when it was recorded.
///
/// Informational for the engine: balances always use the stored split
/// amounts, whatever the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Equal shares, extra cents to earlier participants.
    #[default]
    Equal,
    /// Explicit amount per participant.
    Exact,
    /// Custom shares, optionally derived from percentages.
    Custom,
}

/// Expense category used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Meals and groceries.
    Food,
    /// Transport and lodging.
    Travel,
    /// Rent.
    Rent,
    /// Entertainment.
    Entertainment,
    /// Utilities.
    Utilities,
    /// Shopping.
    Shopping,
    /// Healthcare.
    Healthcare,
    /// Anything else.
    #[default]
    Other,
}

/// A participant's assigned share of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// The participant owing this share.
    pub user_id: UserId,
    /// Share amount. Malformed input is read as zero.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub amount: Decimal,
    /// Percentage of the total, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl Split {
    /// Creates a split without percentage information.
    #[must_use]
    pub const fn new(user_id: UserId, amount: Decimal) -> Self {
        Self {
            user_id,
            amount,
            percentage: None,
        }
    }

    /// Attaches a percentage to the split.
    #[must_use]
    pub fn with_percentage(mut self, percentage: Decimal) -> Self {
        self.percentage = Some(percentage);
        self
    }
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense identifier.
    pub id: ExpenseId,
    /// Short description.
    #[serde(default)]
    pub title: String,
    /// Total amount (> 0 once validated).
    pub amount: Decimal,
    /// The user who paid.
    pub paid_by: UserId,
    /// The group this expense belongs to, if any.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// How the total was divided.
    #[serde(default)]
    pub split_mode: SplitMode,
    /// Per-participant shares. Empty for legacy records.
    #[serde(default)]
    pub splits: Vec<Split>,
    /// Reporting category.
    #[serde(default)]
    pub category: ExpenseCategory,
    /// Date the expense happened.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl Expense {
    /// Creates an expense with no group and no splits.
    #[must_use]
    pub fn new(amount: Decimal, paid_by: UserId) -> Self {
        Self {
            id: ExpenseId::new(),
            title: String::new(),
            amount,
            paid_by,
            group_id: None,
            split_mode: SplitMode::default(),
            splits: Vec::new(),
            category: ExpenseCategory::default(),
            date: None,
            notes: String::new(),
        }
    }

    /// Sets the group.
    #[must_use]
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Sets explicit splits and the split mode.
    #[must_use]
    pub fn with_splits(mut self, split_mode: SplitMode, splits: Vec<Split>) -> Self {
        self.split_mode = split_mode;
        self.splits = splits;
        self
    }

    /// Sets the reporting category.
    #[must_use]
    pub fn categorized(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the date the expense happened.
    #[must_use]
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns true if the expense stores its own splits.
    #[must_use]
    pub fn has_splits(&self) -> bool {
        !self.splits.is_empty()
    }

    /// Returns true if `user_id` paid or holds a stored split.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.paid_by == user_id || self.splits.iter().any(|s| s.user_id == user_id)
    }

    /// Sum of the stored split amounts.
    #[must_use]
    pub fn split_total(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount).sum()
    }
}

/// Narrows the expenses considered for a user summary.
///
/// Date bounds are inclusive. Once a bound is set, expenses without a date
/// no longer match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only expenses in this group.
    pub group_id: Option<GroupId>,
    /// Only expenses dated on or after this day.
    pub from: Option<NaiveDate>,
    /// Only expenses dated on or before this day.
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// A filter matching every expense.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one group.
    #[must_use]
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Restricts to an inclusive date range; either end may be open.
    #[must_use]
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Returns true if `expense` passes every set criterion.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        if self.group_id.is_some_and(|g| expense.group_id != Some(g)) {
            return false;
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(date) = expense.date else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// A group member as returned by membership resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl Member {
    /// Creates a member.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Outcome of resolving a group's membership.
///
/// Resolution never fails loudly: an unknown group or a broken member list
/// is `Unresolved`, and the caller falls back to a payer-only split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberResolution {
    /// Members in their stored order (may be empty).
    Resolved(Vec<Member>),
    /// The group or its members could not be resolved.
    Unresolved,
}

impl MemberResolution {
    /// Returns the members if resolution produced at least one.
    #[must_use]
    pub fn usable_members(&self) -> Option<&[Member]> {
        match self {
            Self::Resolved(members) if !members.is_empty() => Some(members),
            _ => None,
        }
    }
}
