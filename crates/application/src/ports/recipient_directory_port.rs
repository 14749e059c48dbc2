//! Recipient lookup port

use async_trait::async_trait;
use domain::SubjectId;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port resolving where a subject's bills are delivered
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecipientDirectoryPort: Send + Sync {
    /// The subject's email address, if known
    async fn recipient_for(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<String>, ApplicationError>;
}
