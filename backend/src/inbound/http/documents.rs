//! Identity document handlers.
//!
//! ```text
//! GET /api/v1/documents
//! POST /api/v1/documents {"kind":"RG","fileName":"front.pdf","sizeBytes":204800}
//! GET /api/v1/documents/{id}
//! DELETE /api/v1/documents/{id}
//! ```
//!
//! Documents are registered by metadata; the file body is stored elsewhere.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Document, DocumentKind, DocumentSubmission, DocumentValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DocumentSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_field, parse_uuid};

const KIND_FIELD: FieldName = FieldName::new("kind");
const FILE_NAME_FIELD: FieldName = FieldName::new("fileName");
const SIZE_FIELD: FieldName = FieldName::new("sizeBytes");
const ID_FIELD: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDocumentRequest {
    #[schema(example = "RG")]
    pub kind: String,
    #[schema(example = "front.pdf")]
    pub file_name: String,
    #[schema(example = 204800)]
    pub size_bytes: u64,
}

/// Stored document plus whether it earned `DOCUMENT_VALIDATION`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDocumentResponse {
    #[schema(value_type = DocumentSchema)]
    pub document: Document,
    pub awarded: bool,
}

fn map_submission_error(
    err: DocumentValidationError,
    file_name: &str,
    size_bytes: u64,
) -> Error {
    let (field, value) = match &err {
        DocumentValidationError::EmptyFile | DocumentValidationError::FileTooLarge => {
            (SIZE_FIELD, size_bytes.to_string())
        }
        DocumentValidationError::UnknownKind { value } => (KIND_FIELD, value.clone()),
        _ => (FILE_NAME_FIELD, file_name.to_owned()),
    };
    invalid_field_error(field, &value, err)
}

/// Documents owned by the signed-in fan, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    responses(
        (status = 200, description = "Documents", body = [DocumentSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "listDocuments"
)]
#[get("/documents")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Document>>> {
    let user_id = state.consenting_user(&session).await?;
    Ok(web::Json(state.documents_query.list(&user_id).await?))
}

/// Register a document; one per kind. A validated document earns points once.
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    request_body = SubmitDocumentRequest,
    responses(
        (status = 201, description = "Registered document", body = SubmitDocumentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 409, description = "Kind already submitted", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "submitDocument"
)]
#[post("/documents")]
pub async fn submit_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = state.consenting_user(&session).await?;
    let SubmitDocumentRequest {
        kind,
        file_name,
        size_bytes,
    } = payload.into_inner();
    let kind: DocumentKind = parse_field(&kind, KIND_FIELD)?;
    let submission = DocumentSubmission::new(kind, file_name.as_str(), size_bytes)
        .map_err(|err| map_submission_error(err, &file_name, size_bytes))?;
    let outcome = state.documents.submit(&user_id, submission).await?;
    Ok(HttpResponse::Created().json(SubmitDocumentResponse {
        document: outcome.document,
        awarded: outcome.awarded,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 200, description = "Document", body = DocumentSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "getDocument"
)]
#[get("/documents/{id}")]
pub async fn get_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    let user_id = state.consenting_user(&session).await?;
    let id = parse_uuid(&path.into_inner(), ID_FIELD)?;
    Ok(web::Json(state.documents_query.get(&user_id, id).await?))
}

/// Delete a document. Points it earned are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["documents"],
    operation_id = "deleteDocument"
)]
#[delete("/documents/{id}")]
pub async fn delete_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = state.consenting_user(&session).await?;
    let id = parse_uuid(&path.into_inner(), ID_FIELD)?;
    state.documents.delete(&user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
