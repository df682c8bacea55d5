//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{documents, point_history, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub interests: Option<String>,
    pub activities: Option<String>,
    pub events: Option<String>,
    pub purchases: Option<String>,
    pub twitter_id: Option<String>,
    pub instagram_id: Option<String>,
    pub facebook_id: Option<String>,
    pub twitch_id: Option<String>,
    pub discord_id: Option<String>,
    pub lol_profile: Option<String>,
    pub rainbow_six_profile: Option<String>,
    pub steam_profile: Option<String>,
    pub valorant_profile: Option<String>,
    pub gamersclub_profile: Option<String>,
    pub cs2_profile: Option<String>,
    pub has_accepted_terms: bool,
    pub points: i64,
}

/// Insertable struct for registering a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
}

/// Changeset covering every user column except the ledger-owned total.
///
/// `None` writes `NULL` so unlinking clears a column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub national_id: Option<&'a str>,
    pub interests: Option<&'a str>,
    pub activities: Option<&'a str>,
    pub events: Option<&'a str>,
    pub purchases: Option<&'a str>,
    pub twitter_id: Option<&'a str>,
    pub instagram_id: Option<&'a str>,
    pub facebook_id: Option<&'a str>,
    pub twitch_id: Option<&'a str>,
    pub discord_id: Option<&'a str>,
    pub lol_profile: Option<&'a str>,
    pub rainbow_six_profile: Option<&'a str>,
    pub steam_profile: Option<&'a str>,
    pub valorant_profile: Option<&'a str>,
    pub gamersclub_profile: Option<&'a str>,
    pub cs2_profile: Option<&'a str>,
    pub has_accepted_terms: bool,
}

/// Row struct for reading ledger entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = point_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PointHistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i64,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable ledger entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = point_history)]
pub(crate) struct NewPointHistoryRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i64,
    pub action: &'a str,
    pub kind: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading document metadata.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
