//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::money::{CURRENCY_TOLERANCE, DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger computation settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger computation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Decimal places of the ledger currency (2 means cents).
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Drift accepted when checking that a balance reached zero.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

fn default_decimal_places() -> u32 {
    DEFAULT_DECIMAL_PLACES
}

fn default_tolerance() -> Decimal {
    CURRENCY_TOLERANCE
}

impl LedgerConfig {
    /// Checks the settings are usable for minor-unit arithmetic.
    ///
    /// # Errors
    ///
    /// Returns a message if `decimal_places` exceeds the decimal scale limit
    /// or `tolerance` is negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(format!(
                "ledger.decimal_places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.decimal_places
            ));
        }
        if self.tolerance < Decimal::ZERO {
            return Err(format!(
                "ledger.tolerance cannot be negative, got {}",
                self.tolerance
            ));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            tolerance: default_tolerance(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "splitledger=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the ledger
    /// settings are out of range.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPLITLEDGER").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.ledger.validate().map_err(config::ConfigError::Message)?;

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ledger.decimal_places, 2);
        assert_eq!(config.ledger.tolerance, dec!(0.01));
        assert_eq!(config.logging.filter, "splitledger=info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        temp_env::with_vars_unset(
            [
                "SPLITLEDGER__LEDGER__DECIMAL_PLACES",
                "SPLITLEDGER__LEDGER__TOLERANCE",
                "SPLITLEDGER__LOGGING__FILTER",
                "SPLITLEDGER__LOGGING__JSON",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.decimal_places, 2);
                assert_eq!(config.ledger.tolerance, dec!(0.01));
            },
        );
    }

    #[test]
    fn test_load_reads_environment_overrides() {
        temp_env::with_vars(
            [
                ("SPLITLEDGER__LEDGER__DECIMAL_PLACES", Some("3")),
                ("SPLITLEDGER__LOGGING__FILTER", Some("splitledger=debug")),
                ("SPLITLEDGER__LOGGING__JSON", Some("true")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.decimal_places, 3);
                assert_eq!(config.logging.filter, "splitledger=debug");
                assert!(config.logging.json);
            },
        );
    }

    #[test]
    fn test_load_rejects_unrepresentable_decimal_places() {
        for places in ["9", "29"] {
            temp_env::with_var("SPLITLEDGER__LEDGER__DECIMAL_PLACES", Some(places), || {
                let err = AppConfig::load().unwrap_err();
                assert!(err.to_string().contains("decimal_places must be at most 8"));
            });
        }
    }

    #[test]
    fn test_load_accepts_maximum_decimal_places() {
        temp_env::with_var("SPLITLEDGER__LEDGER__DECIMAL_PLACES", Some("8"), || {
            assert_eq!(AppConfig::load().unwrap().ledger.decimal_places, 8);
        });
    }

    #[test]
    fn test_ledger_validate() {
        assert!(LedgerConfig::default().validate().is_ok());

        let negative = LedgerConfig {
            tolerance: dec!(-0.01),
            ..LedgerConfig::default()
        };
        assert!(negative.validate().is_err());

        let too_precise = LedgerConfig {
            decimal_places: MAX_DECIMAL_PLACES + 1,
            ..LedgerConfig::default()
        };
        assert!(too_precise.validate().is_err());
    }
}
