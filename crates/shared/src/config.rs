//! Application configuration management.

use serde::Deserialize;

use crate::types::{Currency, RoundingPolicy};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Settlement engine defaults.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settlement defaults applied by the service layer.
///
/// The engine itself never reads these: a group's rounding policy is passed into
/// every computation explicitly. `default_rounding` is only what the caller uses
/// for groups created without an explicit option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettlementConfig {
    /// Rounding policy for groups without an explicit option.
    #[serde(default)]
    pub default_rounding: RoundingPolicy,
    /// Currency whose minor unit the engine computes in.
    #[serde(default)]
    pub currency: Currency,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "divvy=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `DIVVY_*` environment variables with `__`
    /// separating nested keys (e.g. `DIVVY_SETTLEMENT__DEFAULT_ROUNDING=round_up`).
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
            .add_source(
                config::Environment::with_prefix("DIVVY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builds configuration from an inline TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or has invalid values.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
