//! E-sports profile validation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::account_support::{award_standard, load_user, store_user};
use crate::domain::ports::{
    EsportsProfileVerifier, EsportsValidationCommand, EsportsValidationOutcome,
    PointsLedgerCommand, UserRepository,
};
use crate::domain::{ActionTag, EsportsPlatform, Error, UserId};

/// Message returned when the verifier itself fails.
pub const VERIFIER_FAILURE_MESSAGE: &str = "error validating profile";
const PROFILE_URL_MAX: usize = 2048;

#[derive(Clone)]
pub struct EsportsValidationService<U, V> {
    users: Arc<U>,
    verifier: Arc<V>,
    ledger: Arc<dyn PointsLedgerCommand>,
}

impl<U, V> EsportsValidationService<U, V> {
    pub fn new(users: Arc<U>, verifier: Arc<V>, ledger: Arc<dyn PointsLedgerCommand>) -> Self {
        Self {
            users,
            verifier,
            ledger,
        }
    }
}

#[async_trait]
impl<U, V> EsportsValidationCommand for EsportsValidationService<U, V>
where
    U: UserRepository,
    V: EsportsProfileVerifier,
{
    async fn validate(
        &self,
        user_id: &UserId,
        platform: EsportsPlatform,
        profile_url: String,
    ) -> Result<EsportsValidationOutcome, Error> {
        let profile_url = profile_url.trim().to_owned();
        if profile_url.is_empty() {
            return Err(Error::invalid_request("profileUrl must not be empty"));
        }
        if profile_url.len() > PROFILE_URL_MAX {
            return Err(Error::invalid_request(format!(
                "profileUrl must be at most {PROFILE_URL_MAX} bytes"
            )));
        }

        let verdict = match self.verifier.verify(platform, &profile_url).await {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(%user_id, %platform, %error, "profile verifier failed");
                return Ok(EsportsValidationOutcome {
                    is_valid: false,
                    message: VERIFIER_FAILURE_MESSAGE.to_owned(),
                    profile_url: None,
                });
            }
        };

        if !verdict.is_valid {
            debug!(%user_id, %platform, "profile rejected");
            return Ok(EsportsValidationOutcome {
                is_valid: false,
                message: verdict.message,
                profile_url: None,
            });
        }

        let mut user = load_user(self.users.as_ref(), user_id).await?;
        user.esports_profiles.set(platform, profile_url.clone());
        store_user(self.users.as_ref(), &user).await?;
        let awarded = award_standard(
            self.ledger.as_ref(),
            user_id,
            ActionTag::EsportsValidation(platform),
        )
        .await?;
        debug!(%user_id, %platform, awarded, "profile validated");

        Ok(EsportsValidationOutcome {
            is_valid: true,
            message: verdict.message,
            profile_url: Some(profile_url),
        })
    }
}
