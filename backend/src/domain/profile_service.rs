//! Profile, terms acceptance and the terms gate.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::account_support::{award_standard, load_user, store_user};
use crate::domain::ports::{
    PointsLedgerCommand, ProfileCommand, ProfileQuery, ProfileUpdateOutcome, TermsGate,
    UserRepository,
};
use crate::domain::{ActionTag, Error, ProfilePatch, User, UserId};

/// Message returned by the terms gate.
pub const TERMS_REQUIRED_MESSAGE: &str = "terms of service must be accepted";

/// Service implementing the profile ports and the terms gate.
#[derive(Clone)]
pub struct ProfileService<U> {
    users: Arc<U>,
    ledger: Arc<dyn PointsLedgerCommand>,
}

impl<U> ProfileService<U> {
    pub fn new(users: Arc<U>, ledger: Arc<dyn PointsLedgerCommand>) -> Self {
        Self { users, ledger }
    }
}

#[async_trait]
impl<U> ProfileCommand for ProfileService<U>
where
    U: UserRepository,
{
    async fn update_profile(
        &self,
        user_id: &UserId,
        patch: ProfilePatch,
    ) -> Result<ProfileUpdateOutcome, Error> {
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        let earns_award = patch.earns_profile_award();
        patch.apply_to(&mut user);
        store_user(self.users.as_ref(), &user).await?;

        let awarded = if earns_award {
            award_standard(self.ledger.as_ref(), user_id, ActionTag::ProfileUpdate).await?
        } else {
            false
        };
        debug!(%user_id, awarded, "profile updated");

        // Re-read so the running total reflects the award.
        let user = load_user(self.users.as_ref(), user_id).await?;
        Ok(ProfileUpdateOutcome { user, awarded })
    }

    async fn update_terms(&self, user_id: &UserId, accepted: bool) -> Result<bool, Error> {
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        user.has_accepted_terms = accepted;
        store_user(self.users.as_ref(), &user).await?;
        debug!(%user_id, accepted, "terms acceptance recorded");
        Ok(accepted)
    }
}

#[async_trait]
impl<U> ProfileQuery for ProfileService<U>
where
    U: UserRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        load_user(self.users.as_ref(), user_id).await
    }

    async fn terms_accepted(&self, user_id: &UserId) -> Result<bool, Error> {
        Ok(load_user(self.users.as_ref(), user_id)
            .await?
            .has_accepted_terms)
    }
}

#[async_trait]
impl<U> TermsGate for ProfileService<U>
where
    U: UserRepository,
{
    async fn require_accepted(&self, user_id: &UserId) -> Result<(), Error> {
        if self.terms_accepted(user_id).await? {
            Ok(())
        } else {
            Err(Error::forbidden(TERMS_REQUIRED_MESSAGE))
        }
    }
}
