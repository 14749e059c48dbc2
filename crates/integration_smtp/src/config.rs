//! SMTP configuration

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// How the connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmtpSecurity {
    /// Plain connect, then upgrade with STARTTLS (submission port 587)
    #[default]
    StartTls,
    /// TLS from the first byte (port 465)
    Implicit,
    /// No TLS; only for local relays
    Plain,
}

/// TLS settings for the SMTP connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether to verify server certificates
    #[serde(default = "default_true")]
    pub verify_certificates: bool,

    /// Path to a custom CA certificate file (PEM format)
    #[serde(default)]
    pub ca_cert_path: Option<PathBuf>,

    /// Minimum TLS version to accept
    #[serde(default = "default_min_tls_version")]
    pub min_tls_version: String,
}

const fn default_true() -> bool {
    true
}

fn default_min_tls_version() -> String {
    "1.2".to_string()
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_certificates: true,
            ca_cert_path: None,
            min_tls_version: default_min_tls_version(),
        }
    }
}

/// SMTP submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Server host name
    pub host: String,

    /// Server port (default: 587)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection security; defaults to implicit TLS on 465 and STARTTLS elsewhere
    #[serde(default)]
    pub security: Option<SmtpSecurity>,

    /// Login name, usually the sender address
    #[serde(default)]
    pub username: Option<String>,

    /// Login password (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Envelope and header sender address
    pub from_address: String,

    /// Display name for the From header
    #[serde(default)]
    pub from_name: Option<String>,

    /// Deadline for one complete session, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TLS settings
    #[serde(default)]
    pub tls: TlsConfig,
}

const fn default_port() -> u16 {
    587
}

const fn default_timeout_secs() -> u64 {
    30
}

impl SmtpConfig {
    /// Configuration for a server with login credentials
    pub fn new(
        host: impl Into<String>,
        from_address: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let from_address = from_address.into();
        Self {
            host: host.into(),
            port: default_port(),
            security: None,
            username: Some(from_address.clone()),
            password: Some(SecretString::from(password.into())),
            from_address,
            from_name: None,
            timeout_secs: default_timeout_secs(),
            tls: TlsConfig::default(),
        }
    }

    /// The security mode in effect
    #[must_use]
    pub fn effective_security(&self) -> SmtpSecurity {
        self.security.unwrap_or(if self.port == 465 {
            SmtpSecurity::Implicit
        } else {
            SmtpSecurity::StartTls
        })
    }

    /// Username and password, when both are present and non-empty
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self
            .password
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|p| !p.is_empty())?;
        Some((username, password))
    }

    /// Validate the configuration
    ///
    /// Credentials are required unless the relay is plaintext.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }
        if !self.from_address.contains('@') {
            return Err("from_address must be an email address".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.effective_security() != SmtpSecurity::Plain && self.credentials().is_none() {
            return Err("username and password are required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_sender_as_username() {
        let config = SmtpConfig::new("smtp.example.com", "toll@example.com", "pw");
        assert_eq!(config.port, 587);
        assert_eq!(config.credentials(), Some(("toll@example.com", "pw")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn security_follows_port() {
        let mut config = SmtpConfig::new("smtp.example.com", "toll@example.com", "pw");
        assert_eq!(config.effective_security(), SmtpSecurity::StartTls);
        config.port = 465;
        assert_eq!(config.effective_security(), SmtpSecurity::Implicit);
        config.security = Some(SmtpSecurity::Plain);
        assert_eq!(config.effective_security(), SmtpSecurity::Plain);
    }

    #[test]
    fn missing_password_fails_validation() {
        let mut config = SmtpConfig::new("smtp.example.com", "toll@example.com", "");
        assert!(config.credentials().is_none());
        assert!(config.validate().is_err());

        config.security = Some(SmtpSecurity::Plain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_sender_fails_validation() {
        let config = SmtpConfig::new("smtp.example.com", "not-an-address", "pw");
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: SmtpConfig = serde_json::from_str(
            r#"{"host": "smtp.example.com", "from_address": "toll@example.com"}"#,
        )
        .unwrap();
        assert_eq!(config.port, 587);
        assert!(config.tls.verify_certificates);
        assert_eq!(config.tls.min_tls_version, "1.2");
        assert!(config.credentials().is_none());
    }

    #[test]
    fn password_is_not_serialized() {
        let config = SmtpConfig::new("smtp.example.com", "toll@example.com", "hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
