//! Driving port for ledger writes.
//!
//! Collaborating services and inbound adapters award and redeem points
//! exclusively through this port.

use async_trait::async_trait;

use crate::domain::{
    ActionTag, AwardOutcome, Error, PointAmount, PointHistoryEntry, RewardId, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsLedgerCommand: Send + Sync {
    /// Award `points` for an award-class action at most once per user.
    ///
    /// A repeated award is reported as [`AwardOutcome::AlreadyAwarded`], not
    /// as an error.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when `action` is a redemption tag.
    /// - `not_found` when the user does not exist.
    async fn award(
        &self,
        user_id: &UserId,
        points: PointAmount,
        action: ActionTag,
    ) -> Result<AwardOutcome, Error>;

    /// Spend `points` on `reward`, recording a negative entry.
    ///
    /// # Errors
    ///
    /// - `insufficient_balance` when the balance is below `points`.
    /// - `not_found` when the user does not exist.
    async fn redeem(
        &self,
        user_id: &UserId,
        reward: RewardId,
        points: PointAmount,
    ) -> Result<PointHistoryEntry, Error>;
}
