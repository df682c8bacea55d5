//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the JSON shape of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A redemption costs more points than the user holds.
    #[schema(rename = "insufficient_balance")]
    InsufficientBalance,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Something went wrong")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::SocialAccounts`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SocialAccounts)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SocialAccountsSchema {
    twitter: Option<String>,
    instagram: Option<String>,
    facebook: Option<String>,
    twitch: Option<String>,
    discord: Option<String>,
}

/// OpenAPI schema for [`crate::domain::EsportsProfiles`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EsportsProfiles, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EsportsProfilesSchema {
    lol: Option<String>,
    rainbow_six: Option<String>,
    steam: Option<String>,
    valorant: Option<String>,
    gamersclub: Option<String>,
    cs2: Option<String>,
}

/// OpenAPI schema for [`crate::domain::User`].
///
/// Fan account with profile fields, linked accounts and the cached balance.
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(value_type = String, example = "123e4567-e89b-12d3-a456-426614174000")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@fanclub.example")]
    email: String,
    address: Option<String>,
    national_id: Option<String>,
    interests: Option<String>,
    activities: Option<String>,
    events: Option<String>,
    purchases: Option<String>,
    social_accounts: SocialAccountsSchema,
    esports_profiles: EsportsProfilesSchema,
    has_accepted_terms: bool,
    /// Cached balance; `GET /api/v1/points/me` recomputes it from history.
    points: i64,
}

/// OpenAPI schema for [`crate::domain::PointHistoryEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PointHistoryEntry, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PointHistoryEntrySchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    /// Signed delta: positive for awards, negative for redemptions.
    #[schema(example = 10)]
    points: i64,
    /// Action tag such as `PROFILE_UPDATE` or `REDEMPTION_sticker`.
    #[schema(example = "SOCIAL_LINK_TWITTER")]
    action: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::UserPoints`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserPoints, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPointsSchema {
    /// Balance recomputed from history.
    points: i64,
    /// History ordered newest first.
    points_history: Vec<PointHistoryEntrySchema>,
}

/// OpenAPI schema for [`crate::domain::DocumentKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DocumentKind)]
pub enum DocumentKindSchema {
    #[schema(rename = "RG")]
    Rg,
    #[schema(rename = "CPF")]
    Cpf,
    #[schema(rename = "CNH")]
    Cnh,
    #[schema(rename = "PASSPORT")]
    Passport,
}

/// OpenAPI schema for [`crate::domain::DocumentStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DocumentStatus)]
pub enum DocumentStatusSchema {
    #[schema(rename = "VALIDATED")]
    Validated,
    #[schema(rename = "REJECTED")]
    Rejected,
}

/// OpenAPI schema for [`crate::domain::Document`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Document, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DocumentSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    kind: DocumentKindSchema,
    #[schema(example = "passport.pdf")]
    file_name: String,
    #[schema(example = 204_800)]
    size_bytes: u64,
    status: DocumentStatusSchema,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}
