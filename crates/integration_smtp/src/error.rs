//! SMTP error types

use thiserror::Error;

/// Errors that can occur while submitting mail
#[derive(Debug, Error)]
pub enum SmtpError {
    /// Host, sender or credentials are missing
    #[error("SMTP not configured: {0}")]
    NotConfigured(String),

    /// Network or TLS connection error
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Server rejected the credentials
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Unexpected reply or I/O failure during the dialogue
    #[error("SMTP protocol error: {0}")]
    Protocol(String),

    /// Address is empty or could inject headers
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The whole session exceeded its deadline
    #[error("SMTP session timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl SmtpError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout { .. })
    }
}
