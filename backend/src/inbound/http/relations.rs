//! Favorite, shopping cart and subscription toggles.
//!
//! ```text
//! POST|DELETE /api/v1/recipes/{id}/favorite
//! POST|DELETE /api/v1/recipes/{id}/shopping_cart
//! POST|DELETE /api/v1/users/{id}/subscribe?recipes_limit=3
//! ```
//!
//! A POST links, a DELETE unlinks, and repeating either on a pair that has
//! already transitioned is a `relationship_conflict`.

use actix_web::{HttpRequest, HttpResponse, delete, post, web};

use crate::domain::ports::RecipeRelation;
use crate::domain::{RecipeId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::QueryParams;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{ShortRecipe, SubscriptionResponse, recipes_limit};
use crate::inbound::http::validation::parse_path_id;

async fn link(
    state: &HttpState,
    session: &SessionContext,
    relation: RecipeRelation,
    path: &str,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let recipe: RecipeId = parse_path_id(path, "recipe")?;
    let summary = state.relations.link_recipe(relation, owner, recipe).await?;
    Ok(HttpResponse::Created().json(ShortRecipe::from(summary)))
}

async fn unlink(
    state: &HttpState,
    session: &SessionContext,
    relation: RecipeRelation,
    path: &str,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let recipe: RecipeId = parse_path_id(path, "recipe")?;
    state
        .relations
        .unlink_recipe(relation, owner, recipe)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the requester's favorites.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = ShortRecipe),
        (status = 400, description = "Already in favorites", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    link(&state, &session, RecipeRelation::Favorite, &path).await
}

/// Remove a recipe from the requester's favorites.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in favorites", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    unlink(&state, &session, RecipeRelation::Favorite, &path).await
}

/// Add a recipe to the requester's shopping cart.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = ShortRecipe),
        (status = 400, description = "Already in the shopping cart", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    link(&state, &session, RecipeRelation::ShoppingCart, &path).await
}

/// Remove a recipe from the requester's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in the shopping cart", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    unlink(&state, &session, RecipeRelation::ShoppingCart, &path).await
}

/// Subscribe the requester to an author.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    params(
        ("id" = i64, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Maximum nested recipes")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Already subscribed or self-subscription", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let author: UserId = parse_path_id(&path, "user")?;
    let limit = recipes_limit(&QueryParams::from_request(&req))?;
    let subscription = state.relations.subscribe(owner, author, limit).await?;
    Ok(HttpResponse::Created().json(SubscriptionResponse::from(subscription)))
}

/// Cancel the requester's subscription to an author.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["relations"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let author: UserId = parse_path_id(&path, "user")?;
    state.relations.unsubscribe(owner, author).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "relations_tests.rs"]
mod tests;
