//! Helpers shared by the services that mutate a user account.

use crate::domain::ports::{PointsLedgerCommand, UserPersistenceError, UserRepository};
use crate::domain::{ActionTag, Error, PointAmount, User, UserId};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

fn user_not_found(user_id: &UserId) -> Error {
    Error::not_found(format!("user {user_id} not found"))
}

pub(crate) async fn load_user<U>(users: &U, user_id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(user_id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| user_not_found(user_id))
}

pub(crate) async fn store_user<U>(users: &U, user: &User) -> Result<(), Error>
where
    U: UserRepository + ?Sized,
{
    if users.update(user).await.map_err(map_user_error)? {
        Ok(())
    } else {
        Err(user_not_found(&user.id))
    }
}

/// Award the standard amount, reporting whether a new entry was written.
pub(crate) async fn award_standard(
    ledger: &dyn PointsLedgerCommand,
    user_id: &UserId,
    action: ActionTag,
) -> Result<bool, Error> {
    let outcome = ledger.award(user_id, PointAmount::STANDARD, action).await?;
    Ok(outcome.is_awarded())
}
