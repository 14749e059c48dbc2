//! Recipient directory backed by the `notification.recipients` map

use std::collections::HashMap;

use application::{error::ApplicationError, ports::RecipientDirectoryPort};
use async_trait::async_trait;
use domain::SubjectId;

/// Fixed subject to email address mapping
#[derive(Debug, Clone, Default)]
pub struct StaticRecipientDirectory {
    recipients: HashMap<String, String>,
}

impl StaticRecipientDirectory {
    /// Build from configuration, dropping blank addresses
    #[must_use]
    pub fn new(recipients: &HashMap<String, String>) -> Self {
        let recipients = recipients
            .iter()
            .map(|(subject, address)| (subject.trim().to_string(), address.trim().to_string()))
            .filter(|(subject, address)| !subject.is_empty() && !address.is_empty())
            .collect();
        Self { recipients }
    }

    /// Number of known recipients
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

#[async_trait]
impl RecipientDirectoryPort for StaticRecipientDirectory {
    async fn recipient_for(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<String>, ApplicationError> {
        Ok(self.recipients.get(subject_id.as_str()).cloned())
    }
}
