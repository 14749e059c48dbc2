//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Trip storage failed; any partial mutation was rolled back
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// A retried sample re-reads the subject's state from storage.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::ExternalService(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_converts() {
        let err: ApplicationError = DomainError::not_found("Trip", "1").into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert_eq!(err.to_string(), "Trip not found: 1");
    }

    #[test]
    fn persistence_is_retryable() {
        assert!(ApplicationError::Persistence("locked".to_string()).is_retryable());
        assert!(ApplicationError::ExternalService("down".to_string()).is_retryable());
    }

    #[test]
    fn configuration_is_not_retryable() {
        assert!(!ApplicationError::Configuration("bad".to_string()).is_retryable());
        assert!(!ApplicationError::Internal("bug".to_string()).is_retryable());
    }

    #[test]
    fn persistence_message() {
        let err = ApplicationError::Persistence("disk full".to_string());
        assert_eq!(err.to_string(), "Persistence failure: disk full");
    }
}
