//! Driving port for creating fan accounts.

use async_trait::async_trait;

use crate::domain::{Email, Error, User, UserName};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create a fan with a fresh id and an empty ledger.
    ///
    /// An email already held by another fan fails with `Conflict`.
    async fn register(&self, name: UserName, email: Email) -> Result<User, Error>;
}
