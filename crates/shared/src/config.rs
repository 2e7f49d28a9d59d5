//! Engine configuration management.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Settlement configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Reporting configuration.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Settlement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Deviations at or below this many cents are treated as rounding noise
    /// and do not flag a settlement.
    #[serde(default = "default_deadband_cents")]
    pub deadband_cents: i64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            deadband_cents: default_deadband_cents(),
        }
    }
}

fn default_deadband_cents() -> i64 {
    100 // one currency unit
}

/// Reporting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// IANA timezone used for companies that have not set one.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SITEBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Parses the configured default timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone name is not a valid IANA identifier.
    pub fn default_timezone(&self) -> Result<chrono_tz::Tz, String> {
        self.reporting
            .default_timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| format!("invalid timezone {}: {e}", self.reporting.default_timezone))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settlement: SettlementConfig::default(),
            reporting: ReportingConfig::default(),
        }
    }
}
