//! Session, profile and terms handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"admin","password":"password"}
//! POST /api/v1/logout
//! POST /api/v1/users {"name":"Marta Silva","email":"marta@example.com"}
//! GET /api/v1/users/me
//! PATCH /api/v1/users/me {"address":"Rua Augusta 10"}
//! GET /api/v1/users/me/terms
//! PUT /api/v1/users/me/terms {"hasAcceptedTerms":true}
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Email, Error, LoginCredentials, LoginValidationError, ProfilePatch, ProfilePatchInput, User,
    UserName, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials posted to `/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// New fan account.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

/// Partial profile update. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub interests: Option<String>,
    pub activities: Option<String>,
    pub events: Option<String>,
    pub purchases: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatchInput {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            name: value.name,
            address: value.address,
            national_id: value.national_id,
            interests: value.interests,
            activities: value.activities,
            events: value.events,
            purchases: value.purchases,
        }
    }
}

/// Updated profile plus whether the update earned points.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    #[schema(value_type = UserSchema)]
    pub user: User,
    pub awarded: bool,
}

/// Terms of service acceptance flag.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermsPayload {
    pub has_accepted_terms: bool,
}

/// Check the fixture credentials, create the fan on first sight and store
/// the id in the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the session. Succeeds whether or not a fan was signed in.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}

/// Create a fan account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = UserSchema, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest { name, email } = payload.into_inner();
    let name = UserName::new(name).map_err(map_profile_validation_error)?;
    let email = Email::new(email).map_err(map_profile_validation_error)?;
    let user = state.registration.register(name, email).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Created().json(user))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn map_profile_validation_error(err: UserValidationError) -> Error {
    let field = match &err {
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
        UserValidationError::EmptyField { field }
        | UserValidationError::FieldTooLong { field, .. } => *field,
        UserValidationError::InvalidEmail => "email",
        UserValidationError::EmptyId | UserValidationError::InvalidId => "profile",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Fetch the signed-in fan's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/me")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let user = state.profile_query.profile(&user_id).await?;
    Ok(web::Json(user))
}

/// Update profile fields; completing the profile earns `PROFILE_UPDATE`.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UpdateProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UpdateProfileResponse>> {
    let user_id = session.require_user_id()?;
    let patch = ProfilePatch::try_from_input(payload.into_inner().into())
        .map_err(map_profile_validation_error)?;
    let outcome = state.profile.update_profile(&user_id, patch).await?;
    Ok(web::Json(UpdateProfileResponse {
        user: outcome.user,
        awarded: outcome.awarded,
    }))
}

/// Whether the signed-in fan accepted the terms of service.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/terms",
    responses(
        (status = 200, description = "Terms flag", body = TermsPayload),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getTerms"
)]
#[get("/users/me/terms")]
pub async fn get_terms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TermsPayload>> {
    let user_id = session.require_user_id()?;
    let has_accepted_terms = state.profile_query.terms_accepted(&user_id).await?;
    Ok(web::Json(TermsPayload { has_accepted_terms }))
}

/// Accept or withdraw acceptance of the terms of service.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/terms",
    request_body = TermsPayload,
    responses(
        (status = 200, description = "Stored terms flag", body = TermsPayload),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateTerms"
)]
#[put("/users/me/terms")]
pub async fn update_terms(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TermsPayload>,
) -> ApiResult<web::Json<TermsPayload>> {
    let user_id = session.require_user_id()?;
    let has_accepted_terms = state
        .profile
        .update_terms(&user_id, payload.has_accepted_terms)
        .await?;
    Ok(web::Json(TermsPayload { has_accepted_terms }))
}
