//! Driving port for ledger reads.

use async_trait::async_trait;

use crate::domain::{ActionTag, Error, UserId, UserPoints};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsLedgerQuery: Send + Sync {
    /// Whether an entry with exactly this tag exists for the user.
    async fn has_action_been_performed(
        &self,
        user_id: &UserId,
        action: &ActionTag,
    ) -> Result<bool, Error>;

    /// Balance recomputed from history, with history newest first.
    async fn user_points(&self, user_id: &UserId) -> Result<UserPoints, Error>;
}
