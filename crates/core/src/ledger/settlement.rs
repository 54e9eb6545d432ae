//! Greedy settlement planning.
//!
//! Turns net balances into directed transfers that bring everyone to zero.
//! Creditors are sorted by largest credit, debtors by largest debt, and a
//! two-pointer sweep pairs them off. The result is deterministic but not
//! guaranteed to use the minimum number of transfers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::LedgerConfig;
use splitledger_shared::types::UserId;
use splitledger_shared::types::money::{round_amount, within_tolerance};

use super::balance::Balance;

/// A transfer: `from` pays `to` the stated amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The paying participant.
    pub from: UserId,
    /// Display name of the payer.
    pub from_name: String,
    /// The receiving participant.
    pub to: UserId,
    /// Display name of the receiver.
    pub to_name: String,
    /// Amount to transfer (always positive).
    pub amount: Decimal,
}

impl Settlement {
    /// True if `user_id` pays or receives in this settlement.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.from == user_id || self.to == user_id
    }
}

/// A participant's remaining position during the sweep.
struct Position<'a> {
    balance: &'a Balance,
    remaining: Decimal,
}

/// Plans settlements from net balances.
#[derive(Debug, Clone, Copy)]
pub struct SettlementPlanner {
    decimal_places: u32,
    tolerance: Decimal,
}

impl SettlementPlanner {
    /// Creates a planner from ledger settings.
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            decimal_places: config.decimal_places,
            tolerance: config.tolerance,
        }
    }

    /// Produces the ordered transfers that settle `balances`.
    ///
    /// Ties in the creditor and debtor orderings keep input order. A side is
    /// considered settled once its remaining amount is within the tolerance
    /// of zero; leftover drift is never emitted.
    #[must_use]
    pub fn plan(&self, balances: &[Balance]) -> Vec<Settlement> {
        let mut creditors: Vec<Position<'_>> = balances
            .iter()
            .filter(|b| b.is_creditor())
            .map(|balance| Position {
                balance,
                remaining: balance.net,
            })
            .collect();
        let mut debtors: Vec<Position<'_>> = balances
            .iter()
            .filter(|b| b.is_debtor())
            .map(|balance| Position {
                balance,
                remaining: balance.net,
            })
            .collect();

        // Largest credit first, most negative debt first
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| a.remaining.cmp(&b.remaining));

        let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
        let (mut i, mut j) = (0, 0);

        while i < creditors.len() && j < debtors.len() {
            let credit = creditors[i].remaining;
            let debt = debtors[j].remaining.abs();
            let settle_amount = credit.min(debt);

            let amount = round_amount(settle_amount, self.decimal_places);
            if amount > Decimal::ZERO {
                settlements.push(Settlement {
                    from: debtors[j].balance.user_id,
                    from_name: debtors[j].balance.name.clone(),
                    to: creditors[i].balance.user_id,
                    to_name: creditors[i].balance.name.clone(),
                    amount,
                });
            }

            creditors[i].remaining = round_amount(credit - settle_amount, self.decimal_places);
            debtors[j].remaining =
                round_amount(debtors[j].remaining + settle_amount, self.decimal_places);

            if self.is_settled(creditors[i].remaining) {
                i += 1;
            }
            if self.is_settled(debtors[j].remaining) {
                j += 1;
            }
        }

        settlements
    }

    fn is_settled(&self, remaining: Decimal) -> bool {
        remaining.is_zero() || within_tolerance(remaining, Decimal::ZERO, self.tolerance)
    }
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}

/// Applies settlements to balances, returning each participant's resulting net.
///
/// The payer's net rises by the amount and the receiver's falls by it.
#[must_use]
pub fn apply_settlements(balances: &[Balance], settlements: &[Settlement]) -> Vec<(UserId, Decimal)> {
    let mut nets: Vec<(UserId, Decimal)> = balances.iter().map(|b| (b.user_id, b.net)).collect();

    for settlement in settlements {
        for (user_id, net) in &mut nets {
            if *user_id == settlement.from {
                *net += settlement.amount;
            } else if *user_id == settlement.to {
                *net -= settlement.amount;
            }
        }
    }

    nets
}
