//! Tag and ingredient read endpoints.
//!
//! ```text
//! GET /api/v1/tags
//! GET /api/v1/tags/{id}
//! GET /api/v1/ingredients?name=mi
//! GET /api/v1/ingredients/{id}
//! ```
//!
//! Reference data is public and never paginated.

use actix_web::{HttpRequest, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Ingredient, IngredientFilter, IngredientId, Tag, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::QueryParams;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_path_id;

/// Query parameter holding the ingredient name prefix.
pub const NAME_QUERY_PARAM: &str = "name";

/// Tag representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "#E26C2D")]
    pub color: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

/// Ingredient representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "Milk")]
    pub name: String,
    #[schema(example = "ml")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// List every tag ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags", body = [TagResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Fetch a single tag.
#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagResponse>> {
    let id: TagId = parse_path_id(&path, "tag")?;
    let tag = state.catalogue.get_tag(id).await?;
    Ok(web::Json(tag.into()))
}

/// List ingredients, optionally narrowed by a case-insensitive name prefix.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(("name" = Option<String>, Query, description = "Name prefix, case-insensitive")),
    responses(
        (status = 200, description = "Ingredients", body = [IngredientResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let params = QueryParams::from_request(&req);
    let filter = params
        .first(NAME_QUERY_PARAM)
        .map(IngredientFilter::by_name_prefix)
        .unwrap_or_default();
    let ingredients = state.catalogue.list_ingredients(filter).await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// Fetch a single ingredient.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let id: IngredientId = parse_path_id(&path, "ingredient")?;
    let ingredient = state.catalogue.get_ingredient(id).await?;
    Ok(web::Json(ingredient.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestBackend, TestBackendApp, init_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    async fn get_json<T: serde::de::DeserializeOwned>(
        app: &impl TestBackendApp,
        uri: &str,
    ) -> T {
        let res =
            actix_test::call_service(app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
        actix_test::read_body_json(res).await
    }

    #[rstest]
    #[actix_web::test]
    async fn tags_are_listed_in_id_order() {
        let backend = TestBackend::seeded();
        let app = init_app(&backend).await;

        let tags: Vec<TagResponse> = get_json(&app, "/api/v1/tags").await;

        let slugs: Vec<&str> = tags.iter().map(|tag| tag.slug.as_str()).collect();
        assert_eq!(slugs, vec!["breakfast", "lunch", "dinner"]);
        assert!(tags.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[rstest]
    #[case("/api/v1/tags/999", "tag 999 not found")]
    #[case("/api/v1/tags/lunch", "tag not found")]
    #[case("/api/v1/ingredients/999", "ingredient 999 not found")]
    #[actix_web::test]
    async fn unknown_reference_data_is_not_found(#[case] uri: &str, #[case] message: &str) {
        let backend = TestBackend::seeded();
        let app = init_app(&backend).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(serde_json::Value::as_str),
            Some(message)
        );
    }

    #[rstest]
    #[case("/api/v1/ingredients?name=MI", vec!["Milk"])]
    #[case("/api/v1/ingredients?name=", vec!["Flour", "Milk", "Eggs", "Sugar"])]
    #[case("/api/v1/ingredients", vec!["Flour", "Milk", "Eggs", "Sugar"])]
    #[case("/api/v1/ingredients?name=ilk", vec![])]
    #[actix_web::test]
    async fn ingredients_filter_by_name_prefix(#[case] uri: &str, #[case] expected: Vec<&str>) {
        let backend = TestBackend::seeded();
        let app = init_app(&backend).await;

        let ingredients: Vec<IngredientResponse> = get_json(&app, uri).await;

        let names: Vec<&str> = ingredients.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn single_tag_round_trips() {
        let backend = TestBackend::seeded();
        let tag = backend.store.add_tag("Dessert", "#FF00AA", "dessert");
        let app = init_app(&backend).await;

        let body: TagResponse = get_json(&app, &format!("/api/v1/tags/{}", tag.id)).await;

        assert_eq!(body, TagResponse::from(tag));
    }
}
