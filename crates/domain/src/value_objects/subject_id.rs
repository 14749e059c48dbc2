//! Subject identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Maximum accepted length of a subject identifier
const MAX_SUBJECT_ID_LEN: usize = 128;

/// Identifier of a tracked subject (vehicle or account)
///
/// Opaque to the engine; only used as a key for state and locking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Create a subject identifier, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSubjectId` if the trimmed value is empty
    /// or longer than 128 characters
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidSubjectId(
                "subject id must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_SUBJECT_ID_LEN {
            return Err(DomainError::InvalidSubjectId(format!(
                "subject id exceeds {MAX_SUBJECT_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SubjectId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}
