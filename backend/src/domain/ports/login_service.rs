//! Driving port for login.
//!
//! Inbound adapters authenticate through this trait so handler tests can
//! substitute a double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Username accepted by [`FixtureLoginService`].
pub const FIXTURE_USERNAME: &str = "admin";
/// Password accepted by [`FixtureLoginService`].
pub const FIXTURE_PASSWORD: &str = "password";
/// User the fixture credentials resolve to.
pub const FIXTURE_USER_ID: UserId = UserId::new(1);

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Authenticator backed by a fixed credential pair.
///
/// Credential storage is external to this service: `admin` / `password`
/// resolves to user 1 and everything else is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            Ok(FIXTURE_USER_ID)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
