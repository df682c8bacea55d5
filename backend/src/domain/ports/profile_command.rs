//! Driving port for profile and terms updates.

use async_trait::async_trait;

use crate::domain::{Error, ProfilePatch, User, UserId};

/// Updated profile plus whether the update earned the profile award.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdateOutcome {
    pub user: User,
    pub awarded: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply the supplied fields and award `PROFILE_UPDATE` when the patch
    /// touches an award-qualifying field.
    async fn update_profile(
        &self,
        user_id: &UserId,
        patch: ProfilePatch,
    ) -> Result<ProfileUpdateOutcome, Error>;

    /// Record whether the user accepts the terms of service.
    async fn update_terms(&self, user_id: &UserId, accepted: bool) -> Result<bool, Error>;
}
