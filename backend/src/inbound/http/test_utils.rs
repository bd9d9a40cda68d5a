//! Test helpers for inbound HTTP components.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use serde_json::json;

pub use crate::test_support::{TEST_PASSWORD, TestBackend, test_session_middleware};

/// Initialised test service accepting requests built by `TestRequest`.
pub trait TestBackendApp:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestBackendApp for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

/// Initialise the backend's application for `call_service`.
///
/// The returned service owns its state, so it may outlive `backend`.
pub fn init_app(
    backend: &TestBackend,
) -> impl Future<Output = impl TestBackendApp + use<>> + use<> {
    let app = backend.app();
    async move { actix_test::init_service(app).await }
}

/// Extract the session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == crate::test_support::SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}

/// Log in as `username` and return the session cookie.
pub async fn login_as(app: &impl TestBackendApp, username: &str) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": TEST_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login as {username}");
    session_cookie(&res)
}
