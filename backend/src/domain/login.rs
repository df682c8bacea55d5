//! Fixture login that provisions the demo fan account on first use.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::{Uuid, uuid};

use crate::domain::account_support::map_user_error;
use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::{Email, Error, LoginCredentials, User, UserId, UserName};

/// Identifier of the account behind the fixture credentials.
pub const FIXTURE_USER_ID: Uuid = uuid!("123e4567-e89b-12d3-a456-426614174000");
const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";

/// Accepts `admin` / `password` and ensures the matching user row exists.
#[derive(Clone)]
pub struct FixtureLoginService<U> {
    users: Arc<U>,
}

impl<U> FixtureLoginService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn fixture_user() -> Result<User, Error> {
    let name = UserName::new("Admin")
        .map_err(|err| Error::internal(format!("invalid fixture name: {err}")))?;
    let email = Email::new("admin@fanclub.example")
        .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
    Ok(User::new(UserId::from_uuid(FIXTURE_USER_ID), name, email))
}

#[async_trait]
impl<U> LoginService for FixtureLoginService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() != FIXTURE_USERNAME || credentials.password() != FIXTURE_PASSWORD
        {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let user = self
            .users
            .create_if_missing(&fixture_user()?)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "fixture user signed in");
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", true)]
    #[case("admin", "wrong", false)]
    #[case("other", "password", false)]
    #[tokio::test]
    async fn only_fixture_credentials_succeed(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_create_if_missing()
            .times(usize::from(should_succeed))
            .returning(|user| Ok(user.clone()));
        let service = FixtureLoginService::new(Arc::new(users));
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");

        match (should_succeed, service.authenticate(&creds).await) {
            (true, Ok(id)) => assert_eq!(id.as_uuid(), &FIXTURE_USER_ID),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(id)) => panic!("expected failure, got success: {id}"),
        }
    }
}
