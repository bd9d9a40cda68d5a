//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! through the `test-support` feature). Everything runs against the
//! in-memory store, so no database is required.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use pagination::PageSizePolicy;

use crate::Trace;
use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts, Repositories};
use crate::inbound::http::validation::json_config;
use crate::outbound::memory::MemoryStore;

/// Password accepted for every account by [`MemoryLoginService`].
pub const TEST_PASSWORD: &str = "password";

/// Name of the session cookie issued by test apps.
pub const SESSION_COOKIE: &str = crate::server::SESSION_COOKIE_NAME;

/// Login double accepting any stored username with [`TEST_PASSWORD`].
///
/// Lets tests act as several distinct users without credential storage.
#[derive(Debug, Clone)]
pub struct MemoryLoginService {
    store: Arc<MemoryStore>,
}

impl MemoryLoginService {
    /// Authenticate against the accounts held by `store`.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LoginService for MemoryLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.password() != TEST_PASSWORD {
            return Err(Error::unauthorized("invalid credentials"));
        }
        self.store
            .user_by_username(credentials.username())
            .map(|user| user.id)
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
#[must_use]
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware_with_key(Key::generate())
}

fn session_middleware_with_key(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The full `/api/v1` surface over a shared in-memory store.
///
/// The session key is fixed per backend, so cookies issued by one
/// [`Self::app`] instance are accepted by the next.
///
/// # Examples
/// ```
/// use recipes_backend::test_support::TestBackend;
///
/// let backend = TestBackend::seeded();
/// let cook = backend.store.add_user("cook@example.com", "cook", "Ada", "Cook");
/// assert_eq!(backend.store.user_by_username("cook"), Some(cook));
/// ```
#[derive(Clone)]
pub struct TestBackend {
    /// Store backing every repository port; seed it before building the app.
    pub store: Arc<MemoryStore>,
    page_sizes: PageSizePolicy,
    session_key: Key,
}

impl TestBackend {
    /// Wrap an existing store with the default page size policy.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            page_sizes: PageSizePolicy::default(),
            session_key: Key::generate(),
        }
    }

    /// Backend over [`MemoryStore::with_defaults`].
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(Arc::new(MemoryStore::with_defaults()))
    }

    /// Replace the page size policy.
    #[must_use]
    pub fn with_page_sizes(mut self, page_sizes: PageSizePolicy) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    /// Handler state wired to the store, with [`MemoryLoginService`] for login.
    #[must_use]
    pub fn state(&self) -> HttpState {
        let ports = Repositories {
            users: Arc::clone(&self.store),
            catalogue: Arc::clone(&self.store),
            recipes: Arc::clone(&self.store),
            relations: Arc::clone(&self.store),
        }
        .into_ports();
        let ports = HttpStatePorts {
            login: Arc::new(MemoryLoginService::new(Arc::clone(&self.store))),
            ..ports
        };
        HttpState::new(ports, self.page_sizes)
    }

    /// Application mounting the API under `/api/v1` with sessions and tracing.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state()))
            .app_data(json_config())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware_with_key(self.session_key.clone()))
                    .configure(configure_api),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    #[rstest]
    #[case("cook", TEST_PASSWORD, true)]
    #[case("cook", "wrong", false)]
    #[case("ghost", TEST_PASSWORD, false)]
    #[tokio::test]
    async fn login_double_checks_stored_accounts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] accepted: bool,
    ) {
        let store = Arc::new(MemoryStore::new());
        let cook = store.add_user("cook@example.com", "cook", "Ada", "Cook");
        let service = MemoryLoginService::new(store);
        let creds = LoginCredentials::try_from_parts(username, password).expect("credentials");

        match (accepted, service.authenticate(&creds).await) {
            (true, Ok(id)) => assert_eq!(id, cook.id),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (_, other) => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn app_outlives_a_temporary_backend() {
        let app = actix_test::init_service(TestBackend::seeded().app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/tags").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
