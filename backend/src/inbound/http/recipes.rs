//! Recipe resource handlers.
//!
//! ```text
//! GET /api/v1/recipes?tags=lunch&tags=dinner&author=2&is_favorited=1&limit=6&page=1
//! GET /api/v1/recipes/{id}
//! POST /api/v1/recipes
//! PATCH /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! ```
//!
//! Reads are public and compute the per-requester flags; writes need a
//! session and may only touch the requester's own recipes.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DraftIngredient, Error, IngredientId, RecipeDraft, RecipeFilter, RecipeId, RecipePatch,
    RecipeView, TagId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::catalogue::TagResponse;
use crate::inbound::http::query::{QueryParams, page_envelope, page_request};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::AuthorResponse;
use crate::inbound::http::validation::{FieldName, parse_flag, parse_path_id, parse_query_id};

/// Repeatable tag slug filter.
pub const TAGS_QUERY_PARAM: &str = "tags";
/// Author id filter.
pub const AUTHOR_QUERY_PARAM: &str = "author";
/// Favorites flag filter.
pub const IS_FAVORITED_QUERY_PARAM: &str = "is_favorited";
/// Shopping cart flag filter.
pub const IS_IN_SHOPPING_CART_QUERY_PARAM: &str = "is_in_shopping_cart";

/// Ingredient line of a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountRequest {
    #[schema(example = 6)]
    pub id: i64,
    #[schema(example = 250)]
    pub amount: i64,
}

impl From<IngredientAmountRequest> for DraftIngredient {
    fn from(line: IngredientAmountRequest) -> Self {
        Self {
            id: IngredientId::new(line.id),
            amount: line.amount,
        }
    }
}

fn draft_ingredients(lines: Vec<IngredientAmountRequest>) -> Vec<DraftIngredient> {
    lines.into_iter().map(DraftIngredient::from).collect()
}

fn tag_ids(ids: Vec<i64>) -> Vec<TagId> {
    ids.into_iter().map(TagId::new).collect()
}

/// Recipe body for `POST /api/v1/recipes`.
///
/// Missing fields are reported by validation alongside every other broken
/// rule. An `author` member is ignored: recipes belong to the requester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct EditableRecipe {
    pub ingredients: Vec<IngredientAmountRequest>,
    #[schema(example = json!([2, 3]))]
    pub tags: Vec<i64>,
    #[schema(example = "recipes/images/pancakes.png")]
    pub image: String,
    #[schema(example = "Pancakes")]
    pub name: String,
    #[schema(example = "Whisk, rest, fry.")]
    pub text: String,
    /// Minutes.
    #[schema(example = 20)]
    pub cooking_time: i64,
}

impl From<EditableRecipe> for RecipeDraft {
    fn from(body: EditableRecipe) -> Self {
        Self {
            name: body.name,
            image: body.image,
            text: body.text,
            cooking_time: body.cooking_time,
            tags: tag_ids(body.tags),
            ingredients: draft_ingredients(body.ingredients),
        }
    }
}

/// Partial recipe body for `PATCH /api/v1/recipes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecipePatchRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i64>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

impl From<RecipePatchRequest> for RecipePatch {
    fn from(body: RecipePatchRequest) -> Self {
        Self {
            name: body.name,
            image: body.image,
            text: body.text,
            cooking_time: body.cooking_time,
            tags: body.tags.map(tag_ids),
            ingredients: body.ingredients.map(draft_ingredients),
        }
    }
}

/// Ingredient line of a displayed recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    #[schema(example = 6)]
    pub id: i64,
    #[schema(example = "Milk")]
    pub name: String,
    #[schema(example = "ml")]
    pub measurement_unit: String,
    #[schema(example = 250)]
    pub amount: u32,
}

/// Recipe as seen by the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DisplayRecipe {
    #[schema(example = 12)]
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: AuthorResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    #[schema(example = "Pancakes")]
    pub name: String,
    #[schema(example = "recipes/images/pancakes.png")]
    pub image: String,
    #[schema(example = "Whisk, rest, fry.")]
    pub text: String,
    /// Minutes.
    #[schema(example = 20)]
    pub cooking_time: u32,
}

impl From<RecipeView> for DisplayRecipe {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            author_is_subscribed,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        Self {
            id: recipe.id.get(),
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: AuthorResponse::new(recipe.author, author_is_subscribed),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse {
                    id: line.ingredient.id.get(),
                    name: line.ingredient.name,
                    measurement_unit: line.ingredient.measurement_unit,
                    amount: line.amount,
                })
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// One page of recipes, documentation only.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RecipePage {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<DisplayRecipe>,
}

fn present<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .first(key)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
}

pub(crate) fn recipe_filter(params: &QueryParams) -> Result<RecipeFilter, Error> {
    let author = present(params, AUTHOR_QUERY_PARAM)
        .map(|raw| parse_query_id::<UserId>(raw, FieldName::new(AUTHOR_QUERY_PARAM)))
        .transpose()?;
    let flag = |key: &'static str| {
        present(params, key)
            .map(|raw| parse_flag(raw, FieldName::new(key)))
            .transpose()
    };
    Ok(RecipeFilter {
        tags: params
            .all(TAGS_QUERY_PARAM)
            .into_iter()
            .map(str::to_owned)
            .collect(),
        author,
        is_favorited: flag(IS_FAVORITED_QUERY_PARAM)?,
        is_in_shopping_cart: flag(IS_IN_SHOPPING_CART_QUERY_PARAM)?,
    })
}

/// List recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("limit" = Option<u32>, Query, description = "Page size"),
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs, any-of, repeatable"),
        ("author" = Option<i64>, Query, description = "Author id"),
        ("is_favorited" = Option<String>, Query, description = "1/true or 0/false"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "1/true or 0/false")
    ),
    responses(
        (status = 200, description = "Recipes", body = RecipePage),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 404, description = "Page out of range", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security((), ("SessionCookie" = []))
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let viewer = session.user_id()?;
    let params = QueryParams::from_request(&req);
    let filter = recipe_filter(&params)?;
    let page = page_request(&params, &state.page_sizes)?;
    let paged = state.recipes.list_recipes(viewer, filter, page).await?;
    let body = page_envelope(&req, paged, page, DisplayRecipe::from)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Fetch a single recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = DisplayRecipe),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security((), ("SessionCookie" = []))
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: RecipeId = parse_path_id(&path, "recipe")?;
    let viewer = session.user_id()?;
    let view = state.recipes.get_recipe(viewer, id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(DisplayRecipe::from(view)))
}

/// Create a recipe authored by the requester.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = EditableRecipe,
    responses(
        (status = 201, description = "Created", body = DisplayRecipe),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EditableRecipe>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let view = state
        .recipe_commands
        .create_recipe(author, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(DisplayRecipe::from(view)))
}

/// Partially update one of the requester's recipes.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipePatchRequest,
    responses(
        (status = 200, description = "Updated", body = DisplayRecipe),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipePatchRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id: RecipeId = parse_path_id(&path, "recipe")?;
    let view = state
        .recipe_commands
        .update_recipe(actor, id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(DisplayRecipe::from(view)))
}

/// Delete one of the requester's recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id: RecipeId = parse_path_id(&path, "recipe")?;
    state.recipe_commands.delete_recipe(actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
