//! # Configuration
//!
//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file, `settlement-risk.toml` unless
//!    `SETTLEMENT_RISK_CONFIG` names another path
//! 3. environment variables prefixed `SETTLEMENT_RISK__`, with `__`
//!    separating nested keys (`SETTLEMENT_RISK__RISK__MAX_UNSETTLED_TRADES`)
//!    and `SETTLEMENT_RISK__ALERTS__RECIPIENTS` read as a comma-separated list
//!
//! Call `dotenvy::dotenv()` before [`AppConfig::load`] to pick up a `.env`
//! file.
//!
//! # Example file
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [risk]
//! name = "desk"
//! max_unsettled_trades = 150
//! max_counterparty_exposure = "1000000"
//! max_single_trade_value = "750000"
//!
//! [alerts]
//! cooldown_secs = 900
//! recipients = ["risk@example.com"]
//!
//! [smtp]
//! host = "smtp.example.com"
//! port = 587
//! username = "alerts@example.com"
//! password = "secret"
//! ```

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "SETTLEMENT_RISK_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "settlement-risk.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SETTLEMENT_RISK";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Initial risk parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Parameter set name.
    pub name: String,
    /// Maximum number of unsettled trades.
    pub max_unsettled_trades: u64,
    /// Maximum unsettled exposure to one counterparty.
    pub max_counterparty_exposure: Decimal,
    /// Maximum notional of a single unsettled trade.
    pub max_single_trade_value: Decimal,
}

/// Alert dispatch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Cool-down between alerts for the same breach, in seconds.
    pub cooldown_secs: u64,
    /// Alert recipients.
    pub recipients: Vec<String>,
    /// Number of alert records kept for the API.
    pub recent_capacity: usize,
}

impl AlertsConfig {
    /// Cool-down as a `Duration`.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Background evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Seconds between evaluation cycles.
    pub interval_secs: u64,
}

impl EvaluationConfig {
    /// Interval as a `Duration`.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// SMTP relay settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host.
    pub host: String,
    /// Relay port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Sender address; defaults to the user name.
    #[serde(default)]
    pub from_address: Option<String>,
    /// Connection timeout in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

impl SmtpConfig {
    /// Returns the sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        self.from_address.as_deref().unwrap_or(&self.username)
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    30
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server.
    pub server: ServerConfig,
    /// Initial risk parameters.
    pub risk: RiskConfig,
    /// Alert dispatch.
    pub alerts: AlertsConfig,
    /// Background evaluation.
    pub evaluation: EvaluationConfig,
    /// Logging.
    pub logging: LoggingConfig,
    /// SMTP relay; alerts go to the log when absent.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Loads configuration from defaults, the optional file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or the result fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_sources(
            File::new(&path, FileFormat::Toml).required(false),
            environment(),
        )
    }

    /// Loads configuration from defaults overlaid with a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document cannot be parsed or the result
    /// fails validation.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }

    fn from_sources<F>(file: F, env: Environment) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config = defaults()?.add_source(file).add_source(env).build()?;
        Self::finish(config)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.risk.name.trim().is_empty() {
            return Err(ConfigError::Message("risk.name cannot be empty".to_string()));
        }
        if self.risk.max_unsettled_trades == 0 {
            return Err(ConfigError::Message(
                "risk.max_unsettled_trades must be greater than 0".to_string(),
            ));
        }
        if self.risk.max_counterparty_exposure <= Decimal::ZERO {
            return Err(ConfigError::Message(
                "risk.max_counterparty_exposure must be greater than 0".to_string(),
            ));
        }
        if self.risk.max_single_trade_value <= Decimal::ZERO {
            return Err(ConfigError::Message(
                "risk.max_single_trade_value must be greater than 0".to_string(),
            ));
        }
        if self.evaluation.interval_secs == 0 {
            return Err(ConfigError::Message(
                "evaluation.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.smtp.is_some() && self.alerts.recipients.is_empty() {
            return Err(ConfigError::Message(
                "smtp is configured but alerts.recipients is empty".to_string(),
            ));
        }
        if self.alerts.recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Message(
                "alerts.recipients contains an empty address".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            risk: RiskConfig {
                name: "default".to_string(),
                max_unsettled_trades: 150,
                max_counterparty_exposure: Decimal::new(1_000_000, 0),
                max_single_trade_value: Decimal::new(750_000, 0),
            },
            alerts: AlertsConfig {
                cooldown_secs: 900,
                recipients: Vec::new(),
                recent_capacity: 100,
            },
            evaluation: EvaluationConfig { interval_secs: 60 },
            logging: LoggingConfig {
                filter: "info".to_string(),
                json: false,
            },
            smtp: None,
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let d = AppConfig::default();
    Config::builder()
        .set_default("server.host", d.server.host)?
        .set_default("server.port", i64::from(d.server.port))?
        .set_default("risk.name", d.risk.name)?
        .set_default("risk.max_unsettled_trades", d.risk.max_unsettled_trades)?
        .set_default(
            "risk.max_counterparty_exposure",
            d.risk.max_counterparty_exposure.to_string(),
        )?
        .set_default(
            "risk.max_single_trade_value",
            d.risk.max_single_trade_value.to_string(),
        )?
        .set_default("alerts.cooldown_secs", d.alerts.cooldown_secs)?
        .set_default("alerts.recipients", Vec::<String>::new())?
        .set_default("alerts.recent_capacity", d.alerts.recent_capacity as u64)?
        .set_default("evaluation.interval_secs", d.evaluation.interval_secs)?
        .set_default("logging.filter", d.logging.filter)?
        .set_default("logging.json", d.logging.json)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("alerts.recipients")
        .try_parsing(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod built_in {
        use super::*;

        #[test]
        fn empty_document_yields_defaults() {
            let config = AppConfig::from_toml_str("").unwrap();
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
            assert_eq!(config.alerts.cooldown(), Duration::from_secs(900));
            assert!(config.smtp.is_none());
        }
    }

    mod file {
        use super::*;

        #[test]
        fn overrides_selected_values() {
            let config = AppConfig::from_toml_str(
                r#"
                [risk]
                name = "desk"
                max_counterparty_exposure = "500000"

                [alerts]
                recipients = ["ops@example.com", "risk@example.com"]

                [evaluation]
                interval_secs = 5
                "#,
            )
            .unwrap();

            assert_eq!(config.risk.name, "desk");
            assert_eq!(config.risk.max_counterparty_exposure, Decimal::new(500_000, 0));
            assert_eq!(config.risk.max_unsettled_trades, 150);
            assert_eq!(config.alerts.recipients.len(), 2);
            assert_eq!(config.evaluation.interval(), Duration::from_secs(5));
        }

        #[test]
        fn smtp_section_with_defaults() {
            let config = AppConfig::from_toml_str(
                r#"
                [alerts]
                recipients = ["risk@example.com"]

                [smtp]
                host = "smtp.example.com"
                username = "alerts@example.com"
                password = "secret"
                "#,
            )
            .unwrap();

            let smtp = config.smtp.unwrap();
            assert_eq!(smtp.port, 587);
            assert_eq!(smtp.sender(), "alerts@example.com");
            assert!(!format!("{smtp:?}").contains("secret"));
        }
    }

    mod env_layer {
        use super::*;

        #[test]
        fn env_overrides_and_splits_recipients() {
            let vars = config::Map::from([
                (
                    "SETTLEMENT_RISK__RISK__MAX_UNSETTLED_TRADES".to_string(),
                    "10".to_string(),
                ),
                (
                    "SETTLEMENT_RISK__ALERTS__RECIPIENTS".to_string(),
                    "a@example.com,b@example.com".to_string(),
                ),
                ("SETTLEMENT_RISK__SERVER__PORT".to_string(), "8080".to_string()),
            ]);

            let config = AppConfig::from_sources(
                File::from_str("", FileFormat::Toml),
                environment().source(Some(vars)),
            )
            .unwrap();

            assert_eq!(config.risk.max_unsettled_trades, 10);
            assert_eq!(
                config.alerts.recipients,
                vec!["a@example.com".to_string(), "b@example.com".to_string()]
            );
            assert_eq!(config.server.port, 8080);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn zero_limit_rejected() {
            let err = AppConfig::from_toml_str("[risk]\nmax_unsettled_trades = 0").unwrap_err();
            assert!(err.to_string().contains("max_unsettled_trades"));
        }

        #[test]
        fn zero_exposure_rejected() {
            assert!(AppConfig::from_toml_str("[risk]\nmax_counterparty_exposure = \"0\"").is_err());
        }

        #[test]
        fn zero_interval_rejected() {
            assert!(AppConfig::from_toml_str("[evaluation]\ninterval_secs = 0").is_err());
        }

        #[test]
        fn smtp_without_recipients_rejected() {
            let err = AppConfig::from_toml_str(
                "[smtp]\nhost = \"smtp.example.com\"\nusername = \"u\"\npassword = \"p\"",
            )
            .unwrap_err();
            assert!(err.to_string().contains("recipients"));
        }
    }
}
