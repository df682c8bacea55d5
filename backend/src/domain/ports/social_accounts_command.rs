//! Driving port for linking social accounts.

use async_trait::async_trait;

use crate::domain::{Error, SocialAccounts, SocialProvider, UserId};

/// Linked accounts after a link request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLinkOutcome {
    pub accounts: SocialAccounts,
    /// Whether this link earned the provider's award for the first time.
    pub awarded: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialAccountsCommand: Send + Sync {
    /// Store the provider identifier and award `SOCIAL_LINK_<PROVIDER>`.
    async fn link(
        &self,
        user_id: &UserId,
        provider: SocialProvider,
        social_id: String,
    ) -> Result<SocialLinkOutcome, Error>;

    /// Clear the provider identifier. Points already earned are kept.
    async fn unlink(
        &self,
        user_id: &UserId,
        provider: SocialProvider,
    ) -> Result<SocialAccounts, Error>;

    /// Currently linked identifiers.
    async fn accounts(&self, user_id: &UserId) -> Result<SocialAccounts, Error>;
}
