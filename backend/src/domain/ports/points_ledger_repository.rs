//! Port abstraction for ledger persistence.
//!
//! Adapters own the atomic check-and-append for both write paths. Awards are
//! unique per `(user, action)`. Redemptions compute the balance inside the
//! same unit of work as the append.

use async_trait::async_trait;

use crate::domain::{ActionTag, PointHistoryEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger repository adapters.
    pub enum PointsLedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "points ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "points ledger query failed: {message}",
        /// The owning user row does not exist.
        UserNotFound { user_id: String } => "user {user_id} not found",
    }
}

/// Result of an atomic award append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendAward {
    /// The entry was written and the running total incremented.
    Recorded(PointHistoryEntry),
    /// An entry with the same action already exists; nothing was written.
    AlreadyRecorded,
}

/// Result of an atomic redemption append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendRedemption {
    /// The entry was written and the running total decremented.
    Recorded(PointHistoryEntry),
    /// The balance observed inside the unit of work was too low.
    InsufficientBalance { balance: i64 },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsLedgerRepository: Send + Sync {
    /// Whether the user row exists.
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, PointsLedgerRepositoryError>;

    /// Find the entry recorded for the exact action tag.
    async fn find_entry(
        &self,
        user_id: &UserId,
        action: &ActionTag,
    ) -> Result<Option<PointHistoryEntry>, PointsLedgerRepositoryError>;

    /// List every entry for the user, newest first.
    async fn list_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PointHistoryEntry>, PointsLedgerRepositoryError>;

    /// Append an award unless its action was already recorded for the user.
    async fn append_award(
        &self,
        entry: &PointHistoryEntry,
    ) -> Result<AppendAward, PointsLedgerRepositoryError>;

    /// Append a redemption when the balance covers its cost.
    async fn append_redemption(
        &self,
        entry: &PointHistoryEntry,
    ) -> Result<AppendRedemption, PointsLedgerRepositoryError>;
}
