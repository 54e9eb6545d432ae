//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{CURRENCY_TOLERANCE, DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
