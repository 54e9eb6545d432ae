//! Shared types and configuration for SplitLedger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency amount helpers working in exact minor units
//! - Configuration management

pub mod config;
pub mod types;

pub use config::{AppConfig, LedgerConfig, LoggingConfig};
