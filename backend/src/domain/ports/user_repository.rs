//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Insert `user` unless a row with its id exists, returning the stored row.
    async fn create_if_missing(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Persist the mutable profile state of `user`.
    ///
    /// The running points total is owned by the ledger and is never written
    /// here. Returns `false` when no row matched.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;
}
