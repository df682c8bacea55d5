//! Fan registration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::account_support::map_user_error;
use crate::domain::ports::{RegistrationCommand, UserRepository};
use crate::domain::{Email, Error, User, UserId, UserName};

/// Creates accounts through [`UserRepository::create_if_missing`].
#[derive(Clone)]
pub struct RegistrationService<U> {
    users: Arc<U>,
}

impl<U> RegistrationService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> RegistrationCommand for RegistrationService<U>
where
    U: UserRepository,
{
    async fn register(&self, name: UserName, email: Email) -> Result<User, Error> {
        let user = User::new(UserId::random(), name, email);
        let stored = self
            .users
            .create_if_missing(&user)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %stored.id, "fan registered");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use rstest::rstest;

    fn name() -> UserName {
        UserName::new("Marta Silva").expect("valid name")
    }

    fn email() -> Email {
        Email::new("marta@fanclub.test").expect("valid email")
    }

    #[rstest]
    #[tokio::test]
    async fn new_fans_start_with_an_empty_ledger() {
        let mut users = MockUserRepository::new();
        users
            .expect_create_if_missing()
            .times(1)
            .returning(|user| Ok(user.clone()));
        let service = RegistrationService::new(Arc::new(users));

        let user = service.register(name(), email()).await.expect("registered");

        assert_eq!(user.name, name());
        assert_eq!(user.email, email());
        assert_eq!(user.points, 0);
        assert!(!user.has_accepted_terms);
    }

    #[rstest]
    #[tokio::test]
    async fn each_registration_gets_its_own_id() {
        let mut users = MockUserRepository::new();
        users
            .expect_create_if_missing()
            .times(2)
            .returning(|user| Ok(user.clone()));
        let service = RegistrationService::new(Arc::new(users));

        let first = service.register(name(), email()).await.expect("first");
        let second = service
            .register(name(), Email::new("other@fanclub.test").expect("valid email"))
            .await
            .expect("second");

        assert_ne!(first.id, second.id);
    }

    #[rstest]
    #[case(UserPersistenceError::duplicate_email("marta@fanclub.test"), ErrorCode::Conflict)]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_create_if_missing()
            .times(1)
            .return_once(move |_| Err(failure));
        let service = RegistrationService::new(Arc::new(users));

        let err = service
            .register(name(), email())
            .await
            .expect_err("registration fails");
        assert_eq!(err.code(), expected);
    }
}
