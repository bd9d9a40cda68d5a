//! Login and subscription listing handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"admin","password":"password"}
//! GET /api/v1/users/subscriptions?limit=6&page=1&recipes_limit=3
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthorSubscription, Error, LoginCredentials, LoginValidationError, RecipeSummary, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::query::{QueryParams, page_envelope, page_request};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_count};

/// Query parameter truncating nested recipe lists.
pub const RECIPES_LIMIT_QUERY_PARAM: &str = "recipes_limit";

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "password")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let code = match err {
        LoginValidationError::EmptyUsername => "empty_username",
        LoginValidationError::EmptyPassword => "empty_password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": code,
    }))
}

/// Recipe author as seen by the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorResponse {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "cook")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Cook")]
    pub last_name: String,
    /// Whether the requester subscribes to this user.
    pub is_subscribed: bool,
}

impl AuthorResponse {
    /// Render `user` with the requester-relative subscription flag.
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id.get(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Short recipe representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortRecipe {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Pancakes")]
    pub name: String,
    #[schema(example = "recipes/images/pancakes.png")]
    pub image: String,
    /// Minutes.
    #[schema(example = 20)]
    pub cooking_time: u32,
}

impl From<RecipeSummary> for ShortRecipe {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

/// Followed author with their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "cook")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Cook")]
    pub last_name: String,
    /// Always `true`: the requester follows this author.
    pub is_subscribed: bool,
    /// Newest first, truncated by `recipes_limit`.
    pub recipes: Vec<ShortRecipe>,
    /// Number of recipes by the author, ignoring `recipes_limit`.
    pub recipes_count: u64,
}

impl From<AuthorSubscription> for SubscriptionResponse {
    fn from(subscription: AuthorSubscription) -> Self {
        let AuthorSubscription {
            author,
            recipes,
            recipes_count,
        } = subscription;
        Self {
            email: author.email,
            id: author.id.get(),
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed: true,
            recipes: recipes.into_iter().map(ShortRecipe::from).collect(),
            recipes_count,
        }
    }
}

/// One page of subscriptions, documentation only.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct SubscriptionPage {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<SubscriptionResponse>,
}

pub(crate) fn recipes_limit(params: &QueryParams) -> Result<Option<u32>, Error> {
    params
        .first(RECIPES_LIMIT_QUERY_PARAM)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_count(raw, FieldName::new(RECIPES_LIMIT_QUERY_PARAM)))
        .transpose()
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Authors the requester subscribes to, with their recipes.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    params(
        ("limit" = Option<u32>, Query, description = "Page size"),
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("recipes_limit" = Option<u32>, Query, description = "Maximum nested recipes per author")
    ),
    responses(
        (status = 200, description = "Subscriptions", body = SubscriptionPage),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Page out of range", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let params = QueryParams::from_request(&req);
    let page = page_request(&params, &state.page_sizes)?;
    let limit = recipes_limit(&params)?;
    let paged = state
        .subscriptions
        .list_subscriptions(owner, page, limit)
        .await?;
    let body = page_envelope(&req, paged, page, SubscriptionResponse::from)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

#[cfg(test)]
mod tests;
