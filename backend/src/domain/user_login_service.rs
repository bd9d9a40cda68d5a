//! Login backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{FixtureLoginService, LoginService, UserRepository};
use crate::domain::{Error, LoginCredentials, UserId};

/// Checks the fixture credential pair, then confirms the resolved account
/// exists in storage.
#[derive(Clone)]
pub struct UserLoginService<U> {
    users: Arc<U>,
}

impl<U> UserLoginService<U> {
    /// Create a service over the given repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> LoginService for UserLoginService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let id = FixtureLoginService.authenticate(credentials).await?;
        if self.users.find_by_id(id).await?.is_none() {
            debug!(user_id = id.get(), "credentials resolved to an unknown user");
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(id)
    }
}
