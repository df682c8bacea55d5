//! OpenAPI documentation for the fan-club API.
//!
//! [`ApiDoc`] registers every inbound HTTP path together with the schema
//! wrappers from [`crate::inbound::http::schemas`], so domain types stay free
//! of utoipa derives. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it.

use crate::inbound::http::documents::{SubmitDocumentRequest, SubmitDocumentResponse};
use crate::inbound::http::esports::{ValidateProfileRequest, ValidateProfileResponse};
use crate::inbound::http::points::{
    ActionPerformedResponse, AwardRequest, AwardResponse, RedeemRequest,
};
use crate::inbound::http::schemas::{
    DocumentKindSchema, DocumentSchema, DocumentStatusSchema, ErrorCodeSchema, ErrorSchema,
    EsportsProfilesSchema, PointHistoryEntrySchema, SocialAccountsSchema, UserPointsSchema,
    UserSchema,
};
use crate::inbound::http::social::{LinkSocialRequest, LinkSocialResponse};
use crate::inbound::http::users::{
    LoginRequest, RegisterRequest, TermsPayload, UpdateProfileRequest, UpdateProfileResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Fan club API",
        description = "Fan engagement endpoints: profiles, points ledger, social links, \
            e-sports profiles and identity documents."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::get_terms,
        crate::inbound::http::users::update_terms,
        crate::inbound::http::points::get_points,
        crate::inbound::http::points::action_performed,
        crate::inbound::http::points::award_points,
        crate::inbound::http::points::redeem_points,
        crate::inbound::http::social::list_social_accounts,
        crate::inbound::http::social::link_social_account,
        crate::inbound::http::social::unlink_social_account,
        crate::inbound::http::esports::validate_profile,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::documents::submit_document,
        crate::inbound::http::documents::get_document,
        crate::inbound::http::documents::delete_document,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        SocialAccountsSchema,
        EsportsProfilesSchema,
        PointHistoryEntrySchema,
        UserPointsSchema,
        DocumentSchema,
        DocumentKindSchema,
        DocumentStatusSchema,
        LoginRequest,
        RegisterRequest,
        UpdateProfileRequest,
        UpdateProfileResponse,
        TermsPayload,
        AwardRequest,
        AwardResponse,
        RedeemRequest,
        ActionPerformedResponse,
        LinkSocialRequest,
        LinkSocialResponse,
        ValidateProfileRequest,
        ValidateProfileResponse,
        SubmitDocumentRequest,
        SubmitDocumentResponse,
    )),
    tags(
        (name = "users", description = "Registration, session, profile and terms of service"),
        (name = "points", description = "Points ledger: balance, awards and redemptions"),
        (name = "social", description = "Linked social accounts"),
        (name = "esports", description = "E-sports profile validation"),
        (name = "documents", description = "Identity documents"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
