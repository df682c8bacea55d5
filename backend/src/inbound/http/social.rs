//! Social account linking handlers.
//!
//! ```text
//! GET /api/v1/users/me/social-accounts
//! POST /api/v1/users/me/social-accounts {"provider":"twitter","socialId":"@fan"}
//! DELETE /api/v1/users/me/social-accounts/twitter
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{SocialAccounts, SocialProvider};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SocialAccountsSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_field};

const PROVIDER_FIELD: FieldName = FieldName::new("provider");

/// Request body for linking a provider identifier.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkSocialRequest {
    #[schema(example = "twitter")]
    pub provider: String,
    #[schema(example = "@fan")]
    pub social_id: String,
}

/// Linked accounts plus whether this link earned points.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkSocialResponse {
    #[schema(value_type = SocialAccountsSchema)]
    pub accounts: SocialAccounts,
    pub awarded: bool,
}

/// Identifiers linked by the signed-in fan.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/social-accounts",
    responses(
        (status = 200, description = "Linked accounts", body = SocialAccountsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "listSocialAccounts"
)]
#[get("/users/me/social-accounts")]
pub async fn list_social_accounts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SocialAccounts>> {
    let user_id = state.consenting_user(&session).await?;
    Ok(web::Json(state.social.accounts(&user_id).await?))
}

/// Link a provider identifier; the first link per provider earns points.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/social-accounts",
    request_body = LinkSocialRequest,
    responses(
        (status = 200, description = "Linked accounts", body = LinkSocialResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "linkSocialAccount"
)]
#[post("/users/me/social-accounts")]
pub async fn link_social_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LinkSocialRequest>,
) -> ApiResult<web::Json<LinkSocialResponse>> {
    let user_id = state.consenting_user(&session).await?;
    let LinkSocialRequest {
        provider,
        social_id,
    } = payload.into_inner();
    let provider: SocialProvider = parse_field(&provider, PROVIDER_FIELD)?;
    let outcome = state.social.link(&user_id, provider, social_id).await?;
    Ok(web::Json(LinkSocialResponse {
        accounts: outcome.accounts,
        awarded: outcome.awarded,
    }))
}

/// Unlink a provider. Points earned by the link are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/social-accounts/{provider}",
    params(("provider" = String, Path, description = "Provider name, e.g. twitter")),
    responses(
        (status = 200, description = "Remaining accounts", body = SocialAccountsSchema),
        (status = 400, description = "Unknown provider", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "unlinkSocialAccount"
)]
#[delete("/users/me/social-accounts/{provider}")]
pub async fn unlink_social_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SocialAccounts>> {
    let user_id = state.consenting_user(&session).await?;
    let provider: SocialProvider = parse_field(&path.into_inner(), PROVIDER_FIELD)?;
    Ok(web::Json(state.social.unlink(&user_id, provider).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::points::get_points;
    use crate::inbound::http::test_utils::{
        accepted_terms_cookie, memory_state, read_json, test_session_middleware,
    };
    use crate::inbound::http::users::{login, update_terms};
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let (state, _) = memory_state();
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(update_terms)
                    .service(get_points)
                    .service(list_social_accounts)
                    .service(link_social_account)
                    .service(unlink_social_account),
            )
    }

    async fn link<S>(app: &S, cookie: &Cookie<'static>, body: Value) -> ServiceResponse
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/users/me/social-accounts")
            .cookie(cookie.clone())
            .set_json(body)
            .to_request();
        actix_test::call_service(app, request).await
    }

    #[actix_web::test]
    async fn linking_twice_awards_once() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = accepted_terms_cookie(&app).await;
        let body = json!({ "provider": "Twitter", "socialId": " @fan " });

        let first = read_json(link(&app, &cookie, body.clone()).await).await;
        assert_eq!(first["awarded"], true);
        assert_eq!(first["accounts"]["twitter"], "@fan");

        let second = read_json(link(&app, &cookie, body).await).await;
        assert_eq!(second["awarded"], false);

        let points = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/points/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let points = read_json(points).await;
        assert_eq!(points["points"], 10);
        assert_eq!(
            points["pointsHistory"][0]["action"],
            "SOCIAL_LINK_TWITTER"
        );
    }

    #[actix_web::test]
    async fn unlinking_keeps_earned_points() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = accepted_terms_cookie(&app).await;
        link(
            &app,
            &cookie,
            json!({ "provider": "discord", "socialId": "fan#0001" }),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/users/me/social-accounts/discord")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["discord"], Value::Null);

        let points = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/points/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(read_json(points).await["points"], 10);
    }

    #[rstest]
    #[case(json!({ "provider": "myspace", "socialId": "fan" }), Some("provider"))]
    #[case(json!({ "provider": "twitch", "socialId": "   " }), None)]
    #[actix_web::test]
    async fn invalid_links_are_rejected(#[case] body: Value, #[case] field: Option<&str>) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = accepted_terms_cookie(&app).await;

        let response = link(&app, &cookie, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = read_json(response).await;
        assert_eq!(value["code"], "invalid_request");
        if let Some(field) = field {
            assert_eq!(value["details"]["field"], field);
        }
    }

    #[actix_web::test]
    async fn new_fans_have_no_linked_accounts() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = accepted_terms_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me/social-accounts")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let value = read_json(response).await;
        assert!(
            ["twitter", "instagram", "facebook", "twitch", "discord"]
                .iter()
                .all(|provider| value[*provider].is_null())
        );
    }
}
