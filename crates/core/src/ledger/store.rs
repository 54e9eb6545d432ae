//! The expense store boundary.
//!
//! The engine never talks to a database. Whatever holds expenses and group
//! membership implements [`ExpenseStore`] and hands the engine a consistent
//! snapshot. [`InMemoryExpenseStore`] is the reference implementation, loaded
//! from a JSON [`Snapshot`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use splitledger_shared::types::{GroupId, UserId};
use tracing::{debug, warn};

use super::error::LedgerError;
use super::types::{Expense, ExpenseFilter, Member, MemberResolution};

/// Resolves group membership for equal-split derivation.
pub trait MemberResolver {
    /// Returns the group's members in stored order, or `Unresolved`.
    fn resolve_members(&self, group_id: GroupId) -> MemberResolution;

    /// Returns a user's display name, if known.
    fn display_name(&self, _user_id: UserId) -> Option<String> {
        None
    }
}

/// Read access to expenses and groups.
pub trait ExpenseStore: MemberResolver {
    /// All expenses recorded against a group.
    fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError>;

    /// The group's display name.
    fn group_name(&self, group_id: GroupId) -> Option<String>;

    /// Groups the user is a member of.
    fn groups_for_user(&self, user_id: UserId) -> Result<Vec<GroupId>, LedgerError>;

    /// Every expense matching `filter` that can affect the user's balance.
    ///
    /// That is expenses the user paid, expenses with a split for the user,
    /// and split-less expenses in the user's groups.
    fn user_expenses(&self, user_id: UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>, LedgerError>;
}

/// A user entry in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// A group entry in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Member user IDs in join order.
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// A consistent point-in-time copy of users, groups and expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Known users.
    #[serde(default)]
    pub users: Vec<UserRecord>,
    /// Known groups.
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    /// Recorded expenses.
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// Expense store backed by an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExpenseStore {
    users: HashMap<UserId, String>,
    groups: Vec<GroupRecord>,
    expenses: Vec<Expense>,
}

impl InMemoryExpenseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            users: snapshot
                .users
                .into_iter()
                .map(|user| (user.id, user.name))
                .collect(),
            groups: snapshot.groups,
            expenses: snapshot.expenses,
        }
    }

    /// Parses a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Snapshot>(json).map(Self::from_snapshot)
    }

    /// Adds a user.
    #[must_use]
    pub fn with_user(mut self, id: UserId, name: impl Into<String>) -> Self {
        self.users.insert(id, name.into());
        self
    }

    /// Adds a group with its members.
    #[must_use]
    pub fn with_group(mut self, id: GroupId, name: impl Into<String>, members: Vec<UserId>) -> Self {
        self.groups.push(GroupRecord {
            id,
            name: name.into(),
            members,
        });
        self
    }

    /// Adds an expense.
    #[must_use]
    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    fn group(&self, group_id: GroupId) -> Option<&GroupRecord> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}

impl MemberResolver for InMemoryExpenseStore {
    fn resolve_members(&self, group_id: GroupId) -> MemberResolution {
        let Some(group) = self.group(group_id) else {
            debug!(%group_id, "group not found while resolving members");
            return MemberResolution::Unresolved;
        };

        let mut members = Vec::with_capacity(group.members.len());
        for user_id in &group.members {
            match self.users.get(user_id) {
                Some(name) => members.push(Member::new(*user_id, name.clone())),
                None => {
                    warn!(%group_id, %user_id, "group references an unknown user");
                    return MemberResolution::Unresolved;
                }
            }
        }

        MemberResolution::Resolved(members)
    }

    fn display_name(&self, user_id: UserId) -> Option<String> {
        self.users.get(&user_id).cloned()
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError> {
        if self.group(group_id).is_none() {
            return Err(LedgerError::GroupNotFound(group_id));
        }

        Ok(self
            .expenses
            .iter()
            .filter(|e| e.group_id == Some(group_id))
            .cloned()
            .collect())
    }

    fn group_name(&self, group_id: GroupId) -> Option<String> {
        self.group(group_id).map(|g| g.name.clone())
    }

    fn groups_for_user(&self, user_id: UserId) -> Result<Vec<GroupId>, LedgerError> {
        Ok(self
            .groups
            .iter()
            .filter(|g| g.members.contains(&user_id))
            .map(|g| g.id)
            .collect())
    }

    fn user_expenses(&self, user_id: UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>, LedgerError> {
        let groups = self.groups_for_user(user_id)?;

        Ok(self
            .expenses
            .iter()
            .filter(|e| filter.matches(e))
            .filter(|e| {
                e.involves(user_id)
                    || (!e.has_splits() && e.group_id.is_some_and(|g| groups.contains(&g)))
            })
            .cloned()
            .collect())
    }
}
