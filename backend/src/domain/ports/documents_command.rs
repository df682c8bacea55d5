//! Driving ports for identity document use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Document, DocumentSubmission, Error, UserId};

/// Stored document plus whether it earned the validation award.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSubmissionOutcome {
    pub document: Document,
    pub awarded: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentsCommand: Send + Sync {
    /// Classify and store a submission.
    ///
    /// # Errors
    ///
    /// - `conflict` when a document of the same kind already exists.
    async fn submit(
        &self,
        user_id: &UserId,
        submission: DocumentSubmission,
    ) -> Result<DocumentSubmissionOutcome, Error>;

    /// Remove a document owned by the user; `not_found` otherwise.
    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentsQuery: Send + Sync {
    /// Documents owned by the user, newest first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Document>, Error>;

    /// A document owned by the user; `not_found` otherwise.
    async fn get(&self, user_id: &UserId, id: Uuid) -> Result<Document, Error>;
}
