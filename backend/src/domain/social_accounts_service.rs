//! Social account linking.
//!
//! Identifiers arrive already verified by the provider flow. Linking awards
//! the provider's points once; unlinking never revokes them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::account_support::{award_standard, load_user, store_user};
use crate::domain::ports::{
    PointsLedgerCommand, SocialAccountsCommand, SocialLinkOutcome, UserRepository,
};
use crate::domain::{ActionTag, Error, SocialAccounts, SocialProvider, UserId};

const SOCIAL_ID_MAX: usize = 128;

#[derive(Clone)]
pub struct SocialAccountsService<U> {
    users: Arc<U>,
    ledger: Arc<dyn PointsLedgerCommand>,
}

impl<U> SocialAccountsService<U> {
    pub fn new(users: Arc<U>, ledger: Arc<dyn PointsLedgerCommand>) -> Self {
        Self { users, ledger }
    }
}

fn normalise_social_id(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("socialId must not be empty"));
    }
    if trimmed.chars().count() > SOCIAL_ID_MAX {
        return Err(Error::invalid_request(format!(
            "socialId must be at most {SOCIAL_ID_MAX} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

#[async_trait]
impl<U> SocialAccountsCommand for SocialAccountsService<U>
where
    U: UserRepository,
{
    async fn link(
        &self,
        user_id: &UserId,
        provider: SocialProvider,
        social_id: String,
    ) -> Result<SocialLinkOutcome, Error> {
        let social_id = normalise_social_id(&social_id)?;
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        user.social_accounts.set(provider, Some(social_id));
        store_user(self.users.as_ref(), &user).await?;

        let awarded =
            award_standard(self.ledger.as_ref(), user_id, ActionTag::SocialLink(provider)).await?;
        debug!(%user_id, %provider, awarded, "social account linked");
        Ok(SocialLinkOutcome {
            accounts: user.social_accounts,
            awarded,
        })
    }

    async fn unlink(
        &self,
        user_id: &UserId,
        provider: SocialProvider,
    ) -> Result<SocialAccounts, Error> {
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        user.social_accounts.set(provider, None);
        store_user(self.users.as_ref(), &user).await?;
        debug!(%user_id, %provider, "social account unlinked");
        Ok(user.social_accounts)
    }

    async fn accounts(&self, user_id: &UserId) -> Result<SocialAccounts, Error> {
        Ok(load_user(self.users.as_ref(), user_id)
            .await?
            .social_accounts)
    }
}
