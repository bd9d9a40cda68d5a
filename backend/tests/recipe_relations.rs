//! End-to-end tests for recipe listings and relationship toggles.
//!
//! Every test drives the full `/api/v1` surface over the in-memory store,
//! so no database is required.

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use recipes_backend::domain::RelationKind;
use recipes_backend::test_support::{SESSION_COOKIE, TEST_PASSWORD, TestBackend};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn backend() -> TestBackend {
    let backend = TestBackend::seeded();
    backend
        .store
        .add_user("cook@example.com", "cook", "Ada", "Cook");
    backend
        .store
        .add_user("guest@example.com", "guest", "Bo", "Guest");
    backend
}

async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": TEST_PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login as {username}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn create_recipe<S>(app: &S, cookie: &Cookie<'static>, name: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie.clone())
            .set_json(json!({
                "name": name,
                "image": "recipes/images/dish.png",
                "text": "Mix and bake.",
                "cooking_time": 25,
                "tags": [2],
                "ingredients": [{"id": 5, "amount": 200}],
                "author": 999
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED, "create {name}");
    let body: Value = actix_test::read_body_json(res).await;
    body["id"].as_i64().expect("recipe id")
}

async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(app, request.to_request()).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn created_recipes_belong_to_the_requester(backend: TestBackend) {
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login(&app, "cook").await;

    let id = create_recipe(&app, &cookie, "Soda bread").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/recipes/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"]["username"], "cook");
    assert_eq!(body["ingredients"][0]["name"], "Flour");
    assert_eq!(body["ingredients"][0]["amount"], 200);
    assert_eq!(body["is_favorited"], false);
}

#[rstest]
#[actix_web::test]
async fn limit_selects_the_page_size(backend: TestBackend) {
    let app = actix_test::init_service(backend.app()).await;
    let cookie = login(&app, "cook").await;
    for n in 0..12 {
        create_recipe(&app, &cookie, &format!("Loaf {n}")).await;
    }

    let (status, first) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/recipes?limit=5"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["count"], 12);
    assert_eq!(first["results"].as_array().map(Vec::len), Some(5));
    assert_eq!(first["results"][0]["name"], "Loaf 11");
    let next = first["next"].as_str().expect("next link");
    assert!(next.ends_with("/api/v1/recipes?limit=5&page=2"), "{next}");
    assert!(first["previous"].is_null());

    let (_, last) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/recipes?limit=5&page=3"),
    )
    .await;
    assert_eq!(last["results"].as_array().map(Vec::len), Some(2));
    assert!(last["next"].is_null());
    let previous = last["previous"].as_str().expect("previous link");
    assert!(previous.ends_with("/api/v1/recipes?limit=5&page=2"), "{previous}");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/recipes?limit=5&page=4"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[case("favorite", RelationKind::Favorite)]
#[case("shopping_cart", RelationKind::ShoppingCart)]
#[actix_web::test]
async fn toggles_alternate_between_linked_and_unlinked(
    backend: TestBackend,
    #[case] relation: &str,
    #[case] kind: RelationKind,
) {
    let store = backend.store.clone();
    let app = actix_test::init_service(backend.app()).await;
    let cook = login(&app, "cook").await;
    let guest = login(&app, "guest").await;
    let id = create_recipe(&app, &cook, "Scones").await;
    let uri = format!("/api/v1/recipes/{id}/{relation}");

    let expected = [
        ("POST", StatusCode::CREATED, 1),
        ("POST", StatusCode::BAD_REQUEST, 1),
        ("DELETE", StatusCode::NO_CONTENT, 0),
        ("DELETE", StatusCode::BAD_REQUEST, 0),
        ("POST", StatusCode::CREATED, 1),
    ];
    for (method, status, rows) in expected {
        let request = match method {
            "POST" => actix_test::TestRequest::post(),
            _ => actix_test::TestRequest::delete(),
        };
        let (actual, body) = send(&app, request.uri(&uri).cookie(guest.clone())).await;
        assert_eq!(actual, status, "{method} {uri}: {body}");
        if status == StatusCode::BAD_REQUEST {
            assert_eq!(body["code"], "relationship_conflict");
            assert_eq!(body["errors"], body["message"]);
        }
        assert_eq!(store.relation_count(kind), rows);
    }
}

#[rstest]
#[actix_web::test]
async fn repeated_favorite_is_rejected_before_insert(backend: TestBackend) {
    let store = backend.store.clone();
    let app = actix_test::init_service(backend.app()).await;
    let cook = login(&app, "cook").await;
    let id = create_recipe(&app, &cook, "Brioche").await;
    let uri = format!("/api/v1/recipes/{id}/favorite");

    // The in-memory store never yields, so the second request is answered by
    // the existence check once the first has inserted.
    let (first, second) = tokio::join!(
        send(
            &app,
            actix_test::TestRequest::post()
                .uri(&uri)
                .cookie(cook.clone())
        ),
        send(
            &app,
            actix_test::TestRequest::post()
                .uri(&uri)
                .cookie(cook.clone())
        ),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(store.relation_count(RelationKind::Favorite), 1);
}

#[rstest]
#[actix_web::test]
async fn favorites_filter_follows_the_requester(backend: TestBackend) {
    let app = actix_test::init_service(backend.app()).await;
    let cook = login(&app, "cook").await;
    let guest = login(&app, "guest").await;
    let liked = create_recipe(&app, &cook, "Focaccia").await;
    create_recipe(&app, &cook, "Bagels").await;
    let (status, _) = send(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{liked}/favorite"))
            .cookie(guest.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, mine) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes?is_favorited=1")
            .cookie(guest),
    )
    .await;
    assert_eq!(mine["count"], 1);
    assert_eq!(mine["results"][0]["id"], liked);
    assert_eq!(mine["results"][0]["is_favorited"], true);

    let (_, anonymous) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/recipes?is_favorited=1"),
    )
    .await;
    assert_eq!(anonymous["count"], 0);
}

#[rstest]
#[actix_web::test]
async fn subscriptions_round_trip(backend: TestBackend) {
    let store = backend.store.clone();
    let author = store.user_by_username("cook").expect("cook").id;
    let app = actix_test::init_service(backend.app()).await;
    let cook = login(&app, "cook").await;
    let guest = login(&app, "guest").await;
    for name in ["Pita", "Naan", "Roti"] {
        create_recipe(&app, &cook, name).await;
    }
    let uri = format!("/api/v1/users/{author}/subscribe");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("{uri}?recipes_limit=1"))
            .cookie(guest.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().map(Vec::len), Some(1));

    let (_, page) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/subscriptions")
            .cookie(guest.clone()),
    )
    .await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["username"], "cook");

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .cookie(guest.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(store.relation_count(RelationKind::Subscription), 0);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post().uri(&uri).cookie(cook),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "cannot subscribe to yourself");
}
