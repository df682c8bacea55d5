//! Points ledger handlers.
//!
//! ```text
//! GET /api/v1/points/me
//! GET /api/v1/points/me/actions/PROFILE_UPDATE
//! POST /api/v1/points/award {"points":10,"action":"SOCIAL_LINK_TWITTER"}
//! POST /api/v1/points/redeem {"rewardId":"sticker","points":5}
//! ```
//!
//! Every route requires a session and accepted terms.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ActionTag, AwardOutcome, Error, PointAmount, PointHistoryEntry, RewardId, UserPoints,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PointHistoryEntrySchema, UserPointsSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_field};

const POINTS_FIELD: FieldName = FieldName::new("points");
const ACTION_FIELD: FieldName = FieldName::new("action");
const REWARD_FIELD: FieldName = FieldName::new("rewardId");

/// Request body for `POST /api/v1/points/award`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardRequest {
    #[schema(example = 10)]
    pub points: i64,
    #[schema(example = "SOCIAL_LINK_TWITTER")]
    pub action: String,
}

/// Result of an award request.
///
/// `entry` is present only when a new entry was recorded.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardResponse {
    pub awarded: bool,
    pub balance: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PointHistoryEntrySchema>)]
    pub entry: Option<PointHistoryEntry>,
}

/// Request body for `POST /api/v1/points/redeem`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[schema(example = "sticker")]
    pub reward_id: String,
    #[schema(example = 5)]
    pub points: i64,
}

/// Whether an action tag was already recorded.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionPerformedResponse {
    pub action: String,
    pub performed: bool,
}

fn parse_points(points: i64) -> Result<PointAmount, Error> {
    PointAmount::from_signed(points)
        .map_err(|err| invalid_field_error(POINTS_FIELD, &points.to_string(), err))
}

fn parse_award_points(points: i64) -> Result<PointAmount, Error> {
    let amount = parse_points(points)?;
    if amount > PointAmount::STANDARD {
        return Err(invalid_field_error(
            POINTS_FIELD,
            &points.to_string(),
            format!("awards are at most {} points", PointAmount::STANDARD.get()),
        ));
    }
    Ok(amount)
}

/// Balance and history of the signed-in fan, newest entry first.
#[utoipa::path(
    get,
    path = "/api/v1/points/me",
    responses(
        (status = 200, description = "Balance and history", body = UserPointsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "getUserPoints"
)]
#[get("/points/me")]
pub async fn get_points(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserPoints>> {
    let user_id = state.consenting_user(&session).await?;
    let points = state.points_query.user_points(&user_id).await?;
    Ok(web::Json(points))
}

/// Whether the signed-in fan already performed `action`.
#[utoipa::path(
    get,
    path = "/api/v1/points/me/actions/{action}",
    params(("action" = String, Path, description = "Action tag, e.g. PROFILE_UPDATE")),
    responses(
        (status = 200, description = "Lookup result", body = ActionPerformedResponse),
        (status = 400, description = "Unknown action tag", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "hasActionBeenPerformed"
)]
#[get("/points/me/actions/{action}")]
pub async fn action_performed(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActionPerformedResponse>> {
    let user_id = state.consenting_user(&session).await?;
    let action: ActionTag = parse_field(&path.into_inner(), ACTION_FIELD)?;
    let performed = state
        .points_query
        .has_action_been_performed(&user_id, &action)
        .await?;
    Ok(web::Json(ActionPerformedResponse {
        action: action.to_string(),
        performed,
    }))
}

/// Award points for an action at most once.
///
/// Amounts above [`PointAmount::STANDARD`] are refused. Repeating an award is
/// not an error: the response reports `awarded: false` with the unchanged
/// balance.
#[utoipa::path(
    post,
    path = "/api/v1/points/award",
    request_body = AwardRequest,
    responses(
        (status = 200, description = "Award outcome", body = AwardResponse),
        (status = 400, description = "Invalid points or action", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "awardPoints"
)]
#[post("/points/award")]
pub async fn award_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AwardRequest>,
) -> ApiResult<web::Json<AwardResponse>> {
    let user_id = state.consenting_user(&session).await?;
    let AwardRequest { points, action } = payload.into_inner();
    let points = parse_award_points(points)?;
    let action: ActionTag = parse_field(&action, ACTION_FIELD)?;

    let response = match state.points.award(&user_id, points, action).await? {
        AwardOutcome::Awarded { entry, balance } => AwardResponse {
            awarded: true,
            balance,
            entry: Some(entry),
        },
        AwardOutcome::AlreadyAwarded => AwardResponse {
            awarded: false,
            balance: state.points_query.user_points(&user_id).await?.points(),
            entry: None,
        },
    };
    Ok(web::Json(response))
}

/// Spend points on a reward.
#[utoipa::path(
    post,
    path = "/api/v1/points/redeem",
    request_body = RedeemRequest,
    responses(
        (status = 200, description = "Recorded redemption", body = PointHistoryEntrySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Terms not accepted", body = ErrorSchema),
        (status = 422, description = "Insufficient points", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "redeemPoints"
)]
#[post("/points/redeem")]
pub async fn redeem_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RedeemRequest>,
) -> ApiResult<web::Json<PointHistoryEntry>> {
    let user_id = state.consenting_user(&session).await?;
    let RedeemRequest { reward_id, points } = payload.into_inner();
    let reward = RewardId::new(reward_id.as_str())
        .map_err(|err| invalid_field_error(REWARD_FIELD, &reward_id, err))?;
    let points = parse_points(points)?;
    let entry = state.points.redeem(&user_id, reward, points).await?;
    Ok(web::Json(entry))
}
