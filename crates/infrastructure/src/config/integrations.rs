//! Integration configurations: SMTP bill delivery.
//!
//! The Maps client reads [`integration_maps::MapsConfig`] directly.

use integration_smtp::{SmtpConfig, SmtpSecurity, TlsConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::default_true;

/// SMTP server used to deliver bills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpAppConfig {
    /// Server host name
    pub host: String,

    /// Server port (465 = implicit TLS, otherwise STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Login name (defaults to `from_address`)
    #[serde(default)]
    pub username: Option<String>,

    /// Login password (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Sender address
    pub from_address: String,

    /// Sender display name
    #[serde(default)]
    pub from_name: Option<String>,

    /// Whether to verify the server certificate
    #[serde(default = "default_true")]
    pub verify_certificates: bool,

    /// Connection security override (`start_tls`, `implicit`, `plain`)
    #[serde(default)]
    pub security: Option<SmtpSecurity>,
}

const fn default_smtp_port() -> u16 {
    587
}

impl SmtpAppConfig {
    /// Whether a non-empty password is present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }

    /// Convert to the SMTP client configuration
    #[must_use]
    pub fn to_smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.host.clone(),
            port: self.port,
            security: self.security,
            username: Some(
                self.username
                    .clone()
                    .unwrap_or_else(|| self.from_address.clone()),
            ),
            password: self.password.clone(),
            from_address: self.from_address.clone(),
            from_name: self.from_name.clone(),
            timeout_secs: 30,
            tls: TlsConfig {
                verify_certificates: self.verify_certificates,
                ..TlsConfig::default()
            },
        }
    }
}
