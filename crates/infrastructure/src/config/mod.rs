//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `tolling`: Zone data, fare and bill notification
//! - `integrations`: SMTP delivery
//! - `telemetry`: Log output
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then `TOLLGATE_*` environment variables using `__` between sections
//! (e.g. `TOLLGATE_MAPS__API_KEY`).

mod database;
mod integrations;
mod server;
mod telemetry;
mod tolling;

use std::path::Path;

use integration_maps::MapsConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use database::DatabaseConfig;
pub use integrations::SmtpAppConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryAppConfig;
pub use tolling::{FareConfig, NotificationConfig, ZonesConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TOLLGATE";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Trip storage
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Zone reference data
    #[serde(default)]
    pub zones: ZonesConfig,

    /// Tariff
    #[serde(default)]
    pub fare: FareConfig,

    /// Reverse geocoding and distance provider
    #[serde(default)]
    pub maps: MapsConfig,

    /// Bill delivery; absent disables notifications
    #[serde(default)]
    pub smtp: Option<SmtpAppConfig>,

    /// Bill content and recipients
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load from `config.toml` in the working directory and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load from an explicit file (required when given) and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        debug!(
            zones_file = %app_config.zones.data_file,
            database = %app_config.database.path,
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Load the configuration, falling back to defaults with a warning
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Check the configuration
    ///
    /// Returns every problem found. Missing optional integrations (Maps key,
    /// SMTP section) are not errors; they degrade at runtime.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.server.port == 0 {
            problems.push("server.port must be greater than 0".to_string());
        }
        if self.database.path.trim().is_empty() {
            problems.push("database.path must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be greater than 0".to_string());
        }
        if self.zones.identifier_column.trim().is_empty() {
            problems.push("zones.identifier_column must not be empty".to_string());
        }
        if let Err(e) = self.fare.to_fare_schedule() {
            problems.push(format!("fare.rate_per_km: {e}"));
        }
        if self.fare.currency.trim().is_empty() {
            problems.push("fare.currency must not be empty".to_string());
        }
        if let Err(e) = self.maps.validate() {
            problems.push(format!("maps: {e}"));
        }
        if let Some(smtp) = &self.smtp {
            if smtp.has_credentials() {
                if let Err(e) = smtp.to_smtp_config().validate() {
                    problems.push(format!("smtp: {e}"));
                }
            }
        }
        for (subject, address) in &self.notification.recipients {
            if !address.contains('@') {
                problems.push(format!(
                    "notification.recipients.{subject} is not an email address"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.database.path, "tollgate.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.zones.data_file, "final_toll_data.csv");
        assert_eq!(config.zones.identifier_column, "formatted_address");
        assert!((config.fare.rate_per_km - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.fare.currency, "INR");
        assert_eq!(config.notification.subject_line, "Toll Bill: Trip Completed");
        assert_eq!(config.telemetry.log_filter, "info");
        assert!(config.smtp.is_none());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_collects_every_problem() {
        let mut config = AppConfig::default();
        config.fare.rate_per_km = -1.0;
        config.database.max_connections = 0;
        config
            .notification
            .recipients
            .insert("s1".to_string(), "nobody".to_string());

        let problems = config.validate().unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("rate_per_km")));
        assert!(problems.iter().any(|p| p.contains("recipients.s1")));
    }

    #[test]
    fn smtp_without_credentials_is_not_an_error() {
        let mut config = AppConfig::default();
        config.smtp = Some(SmtpAppConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            from_address: "toll@example.com".to_string(),
            from_name: None,
            verify_certificates: true,
            security: None,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[fare]
rate_per_km = 2.5
currency = "EUR"

[zones]
data_file = "/data/zones.csv"

[smtp]
host = "smtp.example.com"
from_address = "toll@example.com"

[notification.recipients]
driver-1 = "driver@example.com"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!((config.fare.rate_per_km - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.fare.currency, "EUR");
        assert_eq!(config.zones.data_file, "/data/zones.csv");
        assert_eq!(config.zones.identifier_column, "formatted_address");
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert!(!smtp.has_credentials());
        assert_eq!(
            config.notification.recipients.get("driver-1").map(String::as_str),
            Some("driver@example.com")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(AppConfig::load_from(Some(Path::new("/nonexistent/tollgate.toml"))).is_err());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let mut config = AppConfig::default();
        config.maps = MapsConfig::with_api_key("secret-key");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
