//! Driving ports for profile reads and the terms gate.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Fetch the user's profile.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;

    /// Whether the user has accepted the terms of service.
    async fn terms_accepted(&self, user_id: &UserId) -> Result<bool, Error>;
}

/// Guard consulted before points, social, e-sports and document use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermsGate: Send + Sync {
    /// Fail with `forbidden` unless the user accepted the terms.
    async fn require_accepted(&self, user_id: &UserId) -> Result<(), Error>;
}
