//! PostgreSQL-backed `PointsLedgerRepository` implementation using Diesel ORM.
//!
//! Both append paths run in a single transaction together with the update of
//! the denormalised `users.points` total:
//!
//! - awards insert with `ON CONFLICT DO NOTHING`, relying on the partial unique
//!   index `point_history_award_once`, so concurrent duplicates resolve to a
//!   single row;
//! - redemptions lock the user row with `FOR UPDATE` before summing history,
//!   serialising concurrent redemptions for the same user.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    AppendAward, AppendRedemption, PointsLedgerRepository, PointsLedgerRepositoryError,
};
use crate::domain::{ActionTag, PointHistoryEntry, UserId};

use super::diesel_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewPointHistoryRow, PointHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{point_history, users};

const AWARD_KIND: &str = "award";
const REDEMPTION_KIND: &str = "redemption";

/// Diesel-backed implementation of the `PointsLedgerRepository` port.
#[derive(Clone)]
pub struct DieselPointsLedgerRepository {
    pool: DbPool,
}

impl DieselPointsLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside an append transaction.
#[derive(Debug)]
enum AppendFailure {
    Database(DieselError),
    UserMissing,
}

impl From<DieselError> for AppendFailure {
    fn from(error: DieselError) -> Self {
        Self::Database(error)
    }
}

fn map_pool_error(error: PoolError) -> PointsLedgerRepositoryError {
    map_basic_pool_error(error, PointsLedgerRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> PointsLedgerRepositoryError {
    map_basic_diesel_error(
        error,
        PointsLedgerRepositoryError::query,
        PointsLedgerRepositoryError::connection,
    )
}

fn map_append_failure(failure: AppendFailure, user_id: Uuid) -> PointsLedgerRepositoryError {
    match failure {
        AppendFailure::UserMissing => {
            PointsLedgerRepositoryError::user_not_found(user_id.to_string())
        }
        AppendFailure::Database(error) if is_foreign_key_violation(&error) => {
            PointsLedgerRepositoryError::user_not_found(user_id.to_string())
        }
        AppendFailure::Database(error) => map_diesel_error(error),
    }
}

fn row_to_entry(row: PointHistoryRow) -> Result<PointHistoryEntry, PointsLedgerRepositoryError> {
    let action: ActionTag = row.action.parse().map_err(|err| {
        PointsLedgerRepositoryError::query(format!("stored action tag is invalid: {err}"))
    })?;
    Ok(PointHistoryEntry {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        points: row.points,
        action,
        created_at: row.created_at,
    })
}

fn entry_to_row<'a>(entry: &PointHistoryEntry, action: &'a str) -> NewPointHistoryRow<'a> {
    NewPointHistoryRow {
        id: entry.id,
        user_id: *entry.user_id.as_uuid(),
        points: entry.points,
        action,
        kind: if entry.action.is_award() {
            AWARD_KIND
        } else {
            REDEMPTION_KIND
        },
        created_at: entry.created_at,
    }
}

#[async_trait]
impl PointsLedgerRepository for DieselPointsLedgerRepository {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, PointsLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            users::table.filter(users::id.eq(user_id.as_uuid())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn find_entry(
        &self,
        user_id: &UserId,
        action: &ActionTag,
    ) -> Result<Option<PointHistoryEntry>, PointsLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tag = action.to_string();

        let row: Option<PointHistoryRow> = point_history::table
            .filter(point_history::user_id.eq(user_id.as_uuid()))
            .filter(point_history::action.eq(tag.as_str()))
            .order((point_history::created_at.desc(), point_history::seq.desc()))
            .select(PointHistoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_entry).transpose()
    }

    async fn list_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PointHistoryEntry>, PointsLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PointHistoryRow> = point_history::table
            .filter(point_history::user_id.eq(user_id.as_uuid()))
            .order((point_history::created_at.desc(), point_history::seq.desc()))
            .select(PointHistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn append_award(
        &self,
        entry: &PointHistoryEntry,
    ) -> Result<AppendAward, PointsLedgerRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let tag = entry.action.to_string();
        let row = entry_to_row(entry, &tag);
        let user_uuid = row.user_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, AppendFailure, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(point_history::table)
                    .values(&row)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                if inserted == 0 {
                    return Ok(AppendAward::AlreadyRecorded);
                }

                let updated = diesel::update(users::table.find(user_uuid))
                    .set(users::points.eq(users::points + row.points))
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(AppendFailure::UserMissing);
                }

                Ok(AppendAward::Recorded(entry.clone()))
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| map_append_failure(failure, user_uuid))
    }

    async fn append_redemption(
        &self,
        entry: &PointHistoryEntry,
    ) -> Result<AppendRedemption, PointsLedgerRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let tag = entry.action.to_string();
        let row = entry_to_row(entry, &tag);
        let user_uuid = row.user_id;
        let cost = -row.points;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, AppendFailure, _>(|conn| {
            async move {
                let locked: Option<Uuid> = users::table
                    .find(user_uuid)
                    .select(users::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Err(AppendFailure::UserMissing);
                }

                let deltas: Vec<i64> = point_history::table
                    .filter(point_history::user_id.eq(user_uuid))
                    .select(point_history::points)
                    .load(conn)
                    .await?;
                let balance: i64 = deltas.iter().sum();
                if balance < cost {
                    return Ok(AppendRedemption::InsufficientBalance { balance });
                }

                diesel::insert_into(point_history::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(users::table.find(user_uuid))
                    .set(users::points.eq(users::points + row.points))
                    .execute(conn)
                    .await?;

                Ok(AppendRedemption::Recorded(entry.clone()))
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| map_append_failure(failure, user_uuid))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and failure mapping; SQL paths are covered by the
    //! embedded PostgreSQL integration suite.
    use super::*;
    use crate::domain::{PointAmount, RewardId};
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn stored_rows_convert_to_entries() {
        let row = PointHistoryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            points: 10,
            action: "SOCIAL_LINK_DISCORD".to_owned(),
            created_at: Utc::now(),
        };

        let entry = row_to_entry(row.clone()).expect("valid row");

        assert_eq!(entry.id, row.id);
        assert_eq!(entry.action.to_string(), "SOCIAL_LINK_DISCORD");
    }

    #[rstest]
    fn unknown_stored_tags_are_query_errors() {
        let row = PointHistoryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            points: 10,
            action: "LEGACY_BONUS".to_owned(),
            created_at: Utc::now(),
        };

        assert!(matches!(
            row_to_entry(row),
            Err(PointsLedgerRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn redemption_rows_carry_redemption_kind() {
        let entry = PointHistoryEntry::redemption(
            UserId::random(),
            RewardId::new("Sticker").expect("reward"),
            PointAmount::new(5).expect("amount"),
            Utc::now(),
        );
        let tag = entry.action.to_string();

        let row = entry_to_row(&entry, &tag);

        assert_eq!(row.kind, REDEMPTION_KIND);
        assert_eq!(row.points, -5);
    }

    #[rstest]
    fn missing_user_maps_to_not_found() {
        let user = Uuid::new_v4();
        let mapped = map_append_failure(AppendFailure::UserMissing, user);
        assert_eq!(
            mapped,
            PointsLedgerRepositoryError::user_not_found(user.to_string())
        );
    }
}
