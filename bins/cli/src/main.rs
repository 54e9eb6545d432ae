//! SplitLedger CLI
//!
//! Computes balances and settlements from a JSON snapshot and prints them
//! as pretty JSON.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use splitledger_core::ledger::{ExpenseFilter, InMemoryExpenseStore, LedgerEngine};
use splitledger_shared::types::{GroupId, UserId};
use splitledger_shared::{AppConfig, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "splitledger")]
#[command(about = "Balances and settlements for shared expenses")]
struct Cli {
    /// Snapshot file with users, groups and expenses.
    snapshot: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Balances and settlements for one group.
    Group {
        /// Group ID.
        group_id: GroupId,
    },
    /// A user's settlements in every group they belong to.
    User {
        /// User ID.
        user_id: UserId,
    },
    /// A user's balance and spending per category.
    Balance {
        /// User ID.
        user_id: UserId,
        /// Only expenses in this group.
        #[arg(long)]
        group: Option<GroupId>,
        /// Only expenses on or after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Only expenses on or before this date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let store = load_store(&cli.snapshot)?;
    let engine = LedgerEngine::with_config(store, &config.ledger);

    let output = match cli.command {
        Command::Group { group_id } => serde_json::to_string_pretty(
            &engine
                .compute_group_ledger(group_id)
                .with_context(|| format!("failed to compute ledger for group {group_id}"))?,
        )?,
        Command::User { user_id } => serde_json::to_string_pretty(
            &engine
                .compute_user_overview(user_id)
                .with_context(|| format!("failed to compute overview for user {user_id}"))?,
        )?,
        Command::Balance {
            user_id,
            group,
            from,
            to,
        } => {
            let mut filter = ExpenseFilter::all().between(from, to);
            if let Some(group_id) = group {
                filter = filter.in_group(group_id);
            }
            serde_json::to_string_pretty(
                &engine
                    .compute_user_summary(user_id, &filter)
                    .with_context(|| format!("failed to compute summary for user {user_id}"))?,
            )?
        }
    };

    println!("{output}");
    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());

    let json_layer = logging
        .json
        .then(|| fmt::layer().json().with_writer(io::stderr));
    let text_layer = (!logging.json).then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn load_store(path: &Path) -> anyhow::Result<InMemoryExpenseStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let store = InMemoryExpenseStore::from_json(&raw)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;
    info!(snapshot = %path.display(), "loaded snapshot");
    Ok(store)
}
