//! Driving port for e-sports profile validation.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{EsportsPlatform, Error, UserId};

/// Response returned to the caller after validation.
///
/// `profile_url` is echoed back only when the profile was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EsportsValidationOutcome {
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EsportsValidationCommand: Send + Sync {
    /// Validate `profile_url`, storing it and awarding
    /// `ESPORTS_VALIDATION_<PLATFORM>` when accepted.
    async fn validate(
        &self,
        user_id: &UserId,
        platform: EsportsPlatform,
        profile_url: String,
    ) -> Result<EsportsValidationOutcome, Error>;
}
