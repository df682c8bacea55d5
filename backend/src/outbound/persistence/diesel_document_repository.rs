//! PostgreSQL-backed `DocumentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError};
use crate::domain::{Document, DocumentKind, DocumentStatus, UserId};

use super::diesel_error_mapping::{
    is_unique_violation_of, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::DocumentRow;
use super::pool::{DbPool, PoolError};
use super::schema::documents;

const KIND_CONSTRAINT: &str = "documents_user_kind_key";

/// Diesel-backed implementation of the `DocumentRepository` port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentRepositoryError {
    map_basic_pool_error(error, DocumentRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> DocumentRepositoryError {
    map_basic_diesel_error(
        error,
        DocumentRepositoryError::query,
        DocumentRepositoryError::connection,
    )
}

fn row_to_document(row: DocumentRow) -> Result<Document, DocumentRepositoryError> {
    let kind: DocumentKind = row
        .kind
        .parse()
        .map_err(|err| DocumentRepositoryError::query(format!("stored kind is invalid: {err}")))?;
    let status: DocumentStatus = row.status.parse().map_err(|err| {
        DocumentRepositoryError::query(format!("stored status is invalid: {err}"))
    })?;
    let size_bytes = u64::try_from(row.size_bytes)
        .map_err(|_| DocumentRepositoryError::query("stored size is negative"))?;

    Ok(Document {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        kind,
        file_name: row.file_name,
        size_bytes,
        status,
        created_at: row.created_at,
    })
}

fn document_to_row(document: &Document) -> Result<DocumentRow, DocumentRepositoryError> {
    let size_bytes = i64::try_from(document.size_bytes)
        .map_err(|_| DocumentRepositoryError::query("document size exceeds storage range"))?;
    Ok(DocumentRow {
        id: document.id,
        user_id: *document.user_id.as_uuid(),
        kind: document.kind.as_str().to_owned(),
        file_name: document.file_name.clone(),
        size_bytes,
        status: document.status.as_str().to_owned(),
        created_at: document.created_at,
    })
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn kind_exists(
        &self,
        user_id: &UserId,
        kind: DocumentKind,
    ) -> Result<bool, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            documents::table
                .filter(documents::user_id.eq(user_id.as_uuid()))
                .filter(documents::kind.eq(kind.as_str())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let row = document_to_row(document)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(documents::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation_of(&err, KIND_CONSTRAINT) {
                    DocumentRepositoryError::kind_taken(document.kind)
                } else {
                    map_diesel_error(err)
                }
            })?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::user_id.eq(user_id.as_uuid()))
            .order((documents::created_at.desc(), documents::id.desc()))
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_document).collect()
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DocumentRow> = documents::table
            .filter(documents::id.eq(id))
            .filter(documents::user_id.eq(user_id.as_uuid()))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_document).transpose()
    }

    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<bool, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            documents::table
                .filter(documents::id.eq(id))
                .filter(documents::user_id.eq(user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
