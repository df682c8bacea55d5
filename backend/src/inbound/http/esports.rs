//! E-sports profile validation handler.
//!
//! ```text
//! POST /api/v1/esports/validate-profile {"platform":"steam","profileUrl":"https://steamcommunity.com/id/fan"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::EsportsPlatform;
use crate::domain::ports::EsportsValidationOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_field};

const PLATFORM_FIELD: FieldName = FieldName::new("platform");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateProfileRequest {
    #[schema(example = "steam")]
    pub platform: String,
    #[schema(example = "https://steamcommunity.com/id/fan")]
    pub profile_url: String,
}

/// Verdict on a submitted profile URL.
///
/// A rejected profile is a normal response with `isValid: false`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateProfileResponse {
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl From<EsportsValidationOutcome> for ValidateProfileResponse {
    fn from(value: EsportsValidationOutcome) -> Self {
        Self {
            is_valid: value.is_valid,
            message: value.message,
            profile_url: value.profile_url,
        }
    }
}

/// Validate a public e-sports profile; accepted profiles earn points once.
#[utoipa::path(
    post,
    path = "/api/v1/esports/validate-profile",
    request_body = ValidateProfileRequest,
    responses(
        (status = 200, description = "Validation verdict", body = ValidateProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["esports"],
    operation_id = "validateEsportsProfile"
)]
#[post("/esports/validate-profile")]
pub async fn validate_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ValidateProfileRequest>,
) -> ApiResult<web::Json<ValidateProfileResponse>> {
    let user_id = state.consenting_user(&session).await?;
    let ValidateProfileRequest {
        platform,
        profile_url,
    } = payload.into_inner();
    let platform: EsportsPlatform = parse_field(&platform, PLATFORM_FIELD)?;
    let outcome = state
        .esports
        .validate(&user_id, platform, profile_url)
        .await?;
    Ok(web::Json(outcome.into()))
}
