//! Mapping of storage errors into the application vocabulary

use application::error::ApplicationError;

use super::connection::DatabaseError;

impl From<DatabaseError> for ApplicationError {
    fn from(e: DatabaseError) -> Self {
        Self::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_persistence_failures() {
        let err: ApplicationError = DatabaseError::Migration("V001".to_string()).into();
        assert!(matches!(err, ApplicationError::Persistence(ref m) if m.contains("V001")));
        assert!(err.is_retryable());
    }
}
