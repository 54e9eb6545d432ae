//! Core business logic for SplitLedger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `allocation` - Cent-exact division of an expense between participants
//! - `ledger` - Balances, settlements and the expense store boundary

pub mod allocation;
pub mod ledger;
