//! Tests for login and subscription listing handlers.

use super::*;
use crate::domain::ports::{FixtureLoginService, RelationsCommand};
use crate::domain::{DraftIngredient, IngredientId, RecipeDraft, TagId, UserId};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{
    TestBackend, TestBackendApp, init_app, login_as, session_cookie, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

async fn post_login(app: &impl TestBackendApp, username: &str, password: &str) -> ServiceResult {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request(),
    )
    .await;
    let status = res.status();
    let has_cookie = res
        .response()
        .cookies()
        .any(|cookie| cookie.name() == "session");
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    ServiceResult {
        status,
        has_cookie,
        body,
    }
}

struct ServiceResult {
    status: StatusCode,
    has_cookie: bool,
    body: Value,
}

fn fixture_login_app(
    backend: &TestBackend,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let state = backend.state();
    let ports = HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        catalogue: state.catalogue,
        recipes: state.recipes,
        recipe_commands: state.recipe_commands,
        relations: state.relations,
        subscriptions: state.subscriptions,
    };
    App::new()
        .app_data(web::Data::new(HttpState::new(ports, state.page_sizes)))
        .app_data(crate::inbound::http::validation::json_config())
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").service(login))
}

#[rstest]
#[case(
    "   ",
    "password",
    ValidationExpectation {
        message: "username must not be empty",
        field: "username",
        code: "empty_username",
    }
)]
#[case(
    "admin",
    "",
    ValidationExpectation {
        message: "password must not be empty",
        field: "password",
        code: "empty_password",
    }
)]
#[actix_web::test]
async fn login_rejects_blank_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let app = init_app(&TestBackend::seeded()).await;

    let result = post_login(&app, username, password).await;

    assert_eq!(result.status, StatusCode::BAD_REQUEST);
    assert!(!result.has_cookie);
    assert_eq!(result.body["code"], "invalid_request");
    assert_eq!(result.body["message"], expected.message);
    assert_eq!(result.body["details"]["field"], expected.field);
    assert_eq!(result.body["details"]["code"], expected.code);
}

#[rstest]
#[case("admin", "password", StatusCode::OK)]
#[case("admin", "hunter2", StatusCode::UNAUTHORIZED)]
#[case("cook", "password", StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn fixture_credentials_establish_a_session(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: StatusCode,
) {
    let backend = TestBackend::seeded();
    backend
        .store
        .add_user("cook@example.com", "cook", "Ada", "Cook");
    let app = actix_test::init_service(fixture_login_app(&backend)).await;

    let result = post_login(&app, username, password).await;

    assert_eq!(result.status, expected);
    assert_eq!(result.has_cookie, expected == StatusCode::OK);
    if expected == StatusCode::UNAUTHORIZED {
        assert_eq!(result.body["message"], "invalid credentials");
    }
}

#[rstest]
#[actix_web::test]
async fn subscriptions_require_a_session() {
    let app = init_app(&TestBackend::seeded()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

async fn seed_author(backend: &TestBackend, username: &str, recipes: usize) -> UserId {
    let author = backend.store.add_user(
        &format!("{username}@example.com"),
        username,
        username,
        "Cook",
    );
    let commands = backend.state().recipe_commands;
    for n in 0..recipes {
        commands
            .create_recipe(
                author.id,
                RecipeDraft {
                    name: format!("{username} recipe {n}"),
                    image: "recipes/images/dish.png".to_owned(),
                    text: "Cook it.".to_owned(),
                    cooking_time: 10,
                    tags: vec![TagId::new(2)],
                    ingredients: vec![DraftIngredient {
                        id: IngredientId::new(5),
                        amount: 1,
                    }],
                },
            )
            .await
            .expect("seed recipe");
    }
    author.id
}

#[rstest]
#[actix_web::test]
async fn subscriptions_list_followed_authors_with_truncated_recipes() {
    let backend = TestBackend::seeded();
    let ada = seed_author(&backend, "ada", 3).await;
    let bo = seed_author(&backend, "bo", 1).await;
    seed_author(&backend, "cy", 2).await;
    let relations = backend.state().relations;
    let admin = UserId::new(1);
    relations.subscribe(admin, bo, None).await.expect("follow bo");
    relations.subscribe(admin, ada, None).await.expect("follow ada");
    let app = init_app(&backend).await;
    let cookie = login_as(&app, "admin").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions?recipes_limit=2")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("Cache-Control")
            .and_then(|value| value.to_str().ok()),
        Some("private, no-cache, must-revalidate")
    );
    let page: Value = actix_test::read_body_json(res).await;
    assert_eq!(page["count"], 2);
    let results = page["results"].as_array().expect("results");
    let usernames: Vec<&str> = results
        .iter()
        .filter_map(|item| item["username"].as_str())
        .collect();
    assert_eq!(usernames, vec!["ada", "bo"]);
    assert_eq!(results[0]["recipes_count"], 3);
    assert_eq!(results[0]["recipes"].as_array().map(Vec::len), Some(2));
    assert_eq!(results[0]["recipes"][0]["name"], "ada recipe 2");
    assert!(results.iter().all(|item| item["is_subscribed"] == true));
}

#[rstest]
#[actix_web::test]
async fn login_cookie_identifies_the_user() {
    let backend = TestBackend::seeded();
    let app = init_app(&backend).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: "admin".into(),
                password: "password".into(),
            })
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = actix_test::read_body_json(res).await;
    assert_eq!(page["count"], 0);
    assert_eq!(page["results"], Value::Array(Vec::new()));
}
