//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The `points` column is maintained by the ledger adapter inside its append
//! transactions; this adapter only reads it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, EsportsProfiles, SocialAccounts, User, UserId, UserName, UserProfile,
};

use super::diesel_error_mapping::{
    is_unique_violation_of, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_write_error(error: DieselError, email: &Email) -> UserPersistenceError {
    if is_unique_violation_of(&error, EMAIL_CONSTRAINT) {
        return UserPersistenceError::duplicate_email(email.as_ref());
    }
    map_diesel_error(error)
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let name = UserName::new(&row.name)
        .map_err(|err| UserPersistenceError::query(format!("stored name is invalid: {err}")))?;
    let email = Email::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email is invalid: {err}")))?;

    Ok(User {
        id: UserId::from_uuid(row.id),
        name,
        email,
        profile: UserProfile {
            address: row.address,
            national_id: row.national_id,
            interests: row.interests,
            activities: row.activities,
            events: row.events,
            purchases: row.purchases,
        },
        social_accounts: SocialAccounts {
            twitter: row.twitter_id,
            instagram: row.instagram_id,
            facebook: row.facebook_id,
            twitch: row.twitch_id,
            discord: row.discord_id,
        },
        esports_profiles: EsportsProfiles {
            lol: row.lol_profile,
            rainbow_six: row.rainbow_six_profile,
            steam: row.steam_profile,
            valorant: row.valorant_profile,
            gamersclub: row.gamersclub_profile,
            cs2: row.cs2_profile,
        },
        has_accepted_terms: row.has_accepted_terms,
        points: row.points,
    })
}

fn changeset_for(user: &User) -> UserProfileChangeset<'_> {
    let profile = &user.profile;
    let social = &user.social_accounts;
    let esports = &user.esports_profiles;
    UserProfileChangeset {
        name: user.name.as_ref(),
        address: profile.address.as_deref(),
        national_id: profile.national_id.as_deref(),
        interests: profile.interests.as_deref(),
        activities: profile.activities.as_deref(),
        events: profile.events.as_deref(),
        purchases: profile.purchases.as_deref(),
        twitter_id: social.twitter.as_deref(),
        instagram_id: social.instagram.as_deref(),
        facebook_id: social.facebook.as_deref(),
        twitch_id: social.twitch.as_deref(),
        discord_id: social.discord.as_deref(),
        lol_profile: esports.lol.as_deref(),
        rainbow_six_profile: esports.rainbow_six.as_deref(),
        steam_profile: esports.steam.as_deref(),
        valorant_profile: esports.valorant.as_deref(),
        gamersclub_profile: esports.gamersclub.as_deref(),
        cs2_profile: esports.cs2.as_deref(),
        has_accepted_terms: user.has_accepted_terms,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn create_if_missing(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
        };
        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &user.email))?;

        let row: UserRow = users::table
            .find(user.id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(users::table.find(user.id.as_uuid()))
            .set((
                changeset_for(user),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &user.email))?;

        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion only; SQL paths run against embedded PostgreSQL.
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn stored_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            address: Some("Rua A, 1".to_owned()),
            national_id: None,
            interests: Some("cs2".to_owned()),
            activities: None,
            events: None,
            purchases: None,
            twitter_id: None,
            instagram_id: None,
            facebook_id: None,
            twitch_id: None,
            discord_id: Some("ada#1".to_owned()),
            lol_profile: None,
            rainbow_six_profile: None,
            steam_profile: Some("https://steamcommunity.com/id/ada".to_owned()),
            valorant_profile: None,
            gamersclub_profile: None,
            cs2_profile: None,
            has_accepted_terms: true,
            points: 30,
        }
    }

    #[rstest]
    fn rows_convert_to_users() {
        let row = stored_row();
        let user = row_to_user(row.clone()).expect("valid row");

        assert_eq!(user.id.as_uuid(), &row.id);
        assert_eq!(user.profile.address.as_deref(), Some("Rua A, 1"));
        assert_eq!(user.social_accounts.discord.as_deref(), Some("ada#1"));
        assert!(user.esports_profiles.steam.is_some());
        assert!(user.has_accepted_terms);
        assert_eq!(user.points, 30);
    }

    #[rstest]
    fn corrupt_email_is_a_query_error() {
        let row = UserRow {
            email: "not-an-email".to_owned(),
            ..stored_row()
        };

        assert!(matches!(
            row_to_user(row),
            Err(UserPersistenceError::Query { .. })
        ));
    }

    #[rstest]
    fn changeset_clears_unlinked_accounts() {
        let mut user = row_to_user(stored_row()).expect("valid row");
        user.social_accounts.discord = None;

        let changeset = changeset_for(&user);

        assert_eq!(changeset.discord_id, None);
        assert_eq!(changeset.name, "Ada");
        assert!(changeset.has_accepted_terms);
    }
}
