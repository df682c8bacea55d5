//! Points ledger domain service.
//!
//! Implements the ledger driving ports on top of [`PointsLedgerRepository`].
//! The repository performs each check-and-append atomically; this service
//! validates inputs, resolves the user, and maps adapter outcomes into the
//! caller-facing vocabulary.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AppendAward, AppendRedemption, PointsLedgerCommand, PointsLedgerQuery,
    PointsLedgerRepository, PointsLedgerRepositoryError,
};
use crate::domain::{
    ActionTag, AwardOutcome, Error, PointAmount, PointHistoryEntry, RewardId, UserId, UserPoints,
    balance_of,
};

/// Message returned when a redemption costs more than the balance.
pub const INSUFFICIENT_POINTS_MESSAGE: &str = "insufficient points for redemption";

/// Ledger service implementing [`PointsLedgerCommand`] and [`PointsLedgerQuery`].
#[derive(Clone)]
pub struct PointsLedgerService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> PointsLedgerService<L> {
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

fn map_ledger_error(error: PointsLedgerRepositoryError) -> Error {
    match error {
        PointsLedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("points ledger unavailable: {message}"))
        }
        PointsLedgerRepositoryError::Query { message } => {
            Error::internal(format!("points ledger error: {message}"))
        }
        PointsLedgerRepositoryError::UserNotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

impl<L> PointsLedgerService<L>
where
    L: PointsLedgerRepository,
{
    async fn require_user(&self, user_id: &UserId) -> Result<(), Error> {
        let exists = self
            .ledger
            .user_exists(user_id)
            .await
            .map_err(map_ledger_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    async fn balance(&self, user_id: &UserId) -> Result<i64, Error> {
        let entries = self
            .ledger
            .list_entries(user_id)
            .await
            .map_err(map_ledger_error)?;
        Ok(balance_of(&entries))
    }
}

#[async_trait]
impl<L> PointsLedgerCommand for PointsLedgerService<L>
where
    L: PointsLedgerRepository,
{
    async fn award(
        &self,
        user_id: &UserId,
        points: PointAmount,
        action: ActionTag,
    ) -> Result<AwardOutcome, Error> {
        if !action.is_award() {
            return Err(Error::invalid_request(format!(
                "{action} is not an award action"
            )));
        }
        self.require_user(user_id).await?;

        // Fast path only; the append below is what enforces uniqueness.
        if self
            .ledger
            .find_entry(user_id, &action)
            .await
            .map_err(map_ledger_error)?
            .is_some()
        {
            debug!(%user_id, %action, "award already recorded");
            return Ok(AwardOutcome::AlreadyAwarded);
        }

        let entry = PointHistoryEntry::award(user_id.clone(), action, points, self.clock.utc());
        match self
            .ledger
            .append_award(&entry)
            .await
            .map_err(map_ledger_error)?
        {
            AppendAward::Recorded(entry) => {
                let balance = self.balance(user_id).await?;
                info!(
                    %user_id,
                    action = %entry.action,
                    points = entry.points,
                    balance,
                    "points awarded"
                );
                Ok(AwardOutcome::Awarded { entry, balance })
            }
            AppendAward::AlreadyRecorded => {
                debug!(%user_id, action = %entry.action, "concurrent award lost the race");
                Ok(AwardOutcome::AlreadyAwarded)
            }
        }
    }

    async fn redeem(
        &self,
        user_id: &UserId,
        reward: RewardId,
        points: PointAmount,
    ) -> Result<PointHistoryEntry, Error> {
        self.require_user(user_id).await?;

        let entry =
            PointHistoryEntry::redemption(user_id.clone(), reward, points, self.clock.utc());
        match self
            .ledger
            .append_redemption(&entry)
            .await
            .map_err(map_ledger_error)?
        {
            AppendRedemption::Recorded(entry) => {
                info!(%user_id, action = %entry.action, points = entry.points, "points redeemed");
                Ok(entry)
            }
            AppendRedemption::InsufficientBalance { balance } => {
                debug!(%user_id, balance, requested = points.get(), "redemption refused");
                Err(
                    Error::insufficient_balance(INSUFFICIENT_POINTS_MESSAGE).with_details(json!({
                        "balance": balance,
                        "requested": points.get(),
                    })),
                )
            }
        }
    }
}

#[async_trait]
impl<L> PointsLedgerQuery for PointsLedgerService<L>
where
    L: PointsLedgerRepository,
{
    async fn has_action_been_performed(
        &self,
        user_id: &UserId,
        action: &ActionTag,
    ) -> Result<bool, Error> {
        let entry = self
            .ledger
            .find_entry(user_id, action)
            .await
            .map_err(map_ledger_error)?;
        Ok(entry.is_some())
    }

    async fn user_points(&self, user_id: &UserId) -> Result<UserPoints, Error> {
        self.require_user(user_id).await?;
        let entries = self
            .ledger
            .list_entries(user_id)
            .await
            .map_err(map_ledger_error)?;
        Ok(UserPoints::from_history(entries))
    }
}

#[cfg(test)]
#[path = "points_ledger_service_tests.rs"]
mod tests;
