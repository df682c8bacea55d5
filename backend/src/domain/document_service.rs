//! Identity document registration and validation.
//!
//! Submissions are checked in a fixed order: file shape (see
//! [`DocumentSubmission::new`]), duplicate kind, then classification. A
//! validated document earns `DOCUMENT_VALIDATION` once; rejected documents are
//! stored without an award.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::account_support::award_standard;
use crate::domain::ports::{
    DocumentClassifier, DocumentClassifierError, DocumentRepository, DocumentRepositoryError,
    DocumentSubmissionOutcome, DocumentsCommand, DocumentsQuery, PointsLedgerCommand,
};
use crate::domain::{
    ActionTag, Document, DocumentKind, DocumentStatus, DocumentSubmission, Error, UserId,
};

#[derive(Clone)]
pub struct DocumentService<R, C> {
    documents: Arc<R>,
    classifier: Arc<C>,
    ledger: Arc<dyn PointsLedgerCommand>,
    clock: Arc<dyn Clock>,
}

impl<R, C> DocumentService<R, C> {
    pub fn new(
        documents: Arc<R>,
        classifier: Arc<C>,
        ledger: Arc<dyn PointsLedgerCommand>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            documents,
            classifier,
            ledger,
            clock,
        }
    }
}

fn kind_conflict(kind: DocumentKind) -> Error {
    Error::conflict(format!(
        "a {kind} document was already submitted; duplicates are not allowed"
    ))
}

fn map_document_error(error: DocumentRepositoryError) -> Error {
    match error {
        DocumentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("document repository unavailable: {message}"))
        }
        DocumentRepositoryError::Query { message } => {
            Error::internal(format!("document repository error: {message}"))
        }
        DocumentRepositoryError::KindTaken { kind } => kind_conflict(kind),
    }
}

fn map_classifier_error(error: DocumentClassifierError) -> Error {
    match error {
        DocumentClassifierError::Unavailable { message } => {
            Error::service_unavailable(format!("document classifier unavailable: {message}"))
        }
    }
}

fn document_not_found(id: Uuid) -> Error {
    Error::not_found(format!("document {id} not found"))
}

#[async_trait]
impl<R, C> DocumentsCommand for DocumentService<R, C>
where
    R: DocumentRepository,
    C: DocumentClassifier,
{
    async fn submit(
        &self,
        user_id: &UserId,
        submission: DocumentSubmission,
    ) -> Result<DocumentSubmissionOutcome, Error> {
        let kind = submission.kind();
        if self
            .documents
            .kind_exists(user_id, kind)
            .await
            .map_err(map_document_error)?
        {
            return Err(kind_conflict(kind));
        }

        let status = self
            .classifier
            .classify(&submission)
            .await
            .map_err(|error| {
                warn!(%user_id, %kind, %error, "document classifier failed");
                map_classifier_error(error)
            })?;

        let document =
            Document::from_submission(user_id.clone(), submission, status, self.clock.utc());
        self.documents
            .insert(&document)
            .await
            .map_err(map_document_error)?;

        let awarded = match status {
            DocumentStatus::Validated => {
                award_standard(self.ledger.as_ref(), user_id, ActionTag::DocumentValidation)
                    .await?
            }
            DocumentStatus::Rejected => false,
        };
        debug!(%user_id, %kind, status = status.as_str(), awarded, "document registered");

        Ok(DocumentSubmissionOutcome { document, awarded })
    }

    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<(), Error> {
        if self
            .documents
            .delete_for_user(user_id, id)
            .await
            .map_err(map_document_error)?
        {
            debug!(%user_id, %id, "document deleted");
            Ok(())
        } else {
            Err(document_not_found(id))
        }
    }
}

#[async_trait]
impl<R, C> DocumentsQuery for DocumentService<R, C>
where
    R: DocumentRepository,
    C: DocumentClassifier,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<Document>, Error> {
        self.documents
            .list_for_user(user_id)
            .await
            .map_err(map_document_error)
    }

    async fn get(&self, user_id: &UserId, id: Uuid) -> Result<Document, Error> {
        self.documents
            .find_for_user(user_id, id)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| document_not_found(id))
    }
}

#[cfg(test)]
#[path = "document_service_tests.rs"]
mod tests;
