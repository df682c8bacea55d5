//! Port abstraction for document metadata persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Document, DocumentKind, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "document repository query failed: {message}",
        /// The user already holds a document of this kind.
        KindTaken { kind: DocumentKind } => "a {kind} document was already submitted",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Whether the user already holds a document of `kind`.
    async fn kind_exists(
        &self,
        user_id: &UserId,
        kind: DocumentKind,
    ) -> Result<bool, DocumentRepositoryError>;

    /// Insert a document, failing with `KindTaken` on a duplicate kind.
    async fn insert(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    /// Documents owned by the user, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    /// Fetch a document only when it belongs to `user_id`.
    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Delete a document owned by `user_id`; `false` when nothing matched.
    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<bool, DocumentRepositoryError>;
}
