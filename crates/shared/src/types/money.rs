//! Currency amount helpers with exact minor-unit arithmetic.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal`; every allocation and rounding
//! decision is taken in integer minor units (cents at two decimal places).

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decimal places of the currencies handled by the ledger.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Largest scale the ledger accepts.
///
/// Minor units are `i64`, so at 8 places amounts up to roughly 92 billion
/// still convert. `rust_decimal` itself stops at 28.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Largest drift accepted when comparing amounts (one cent).
pub const CURRENCY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to `decimal_places`, half away from zero.
///
/// The result always carries exactly `decimal_places` digits, so `30`
/// comes back as `30.00`.
#[must_use]
pub fn round_amount(amount: Decimal, decimal_places: u32) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimal_places);
    rounded
}

/// Converts an amount to integer minor units, rounding half away from zero.
///
/// Returns `None` if the scaled value does not fit in an `i64`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use splitledger_shared::types::money::to_minor_units;
///
/// assert_eq!(to_minor_units(dec!(100.005), 2), Some(10001));
/// assert_eq!(to_minor_units(dec!(33.3), 2), Some(3330));
/// ```
#[must_use]
pub fn to_minor_units(amount: Decimal, decimal_places: u32) -> Option<i64> {
    i64::try_from(round_amount(amount, decimal_places).mantissa()).ok()
}

/// Converts integer minor units back to a decimal amount.
#[must_use]
pub fn from_minor_units(units: i64, decimal_places: u32) -> Decimal {
    Decimal::new(units, decimal_places)
}

/// Returns true if two amounts differ by less than `tolerance`.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() < tolerance
}

/// Reads an amount from loosely typed JSON.
///
/// Numbers and numeric strings are parsed exactly; anything else
/// (`null`, booleans, malformed strings) becomes zero.
#[must_use]
pub fn lenient_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(raw: &str) -> Decimal {
    Decimal::from_str_exact(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}

/// Serde adapter for amounts that must never fail deserialization.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_lenient_amount")]`.
pub fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_amount(&value))
}
