//! Domain primitives, policies and services.
//!
//! Purpose: define the recipe-sharing model independently of HTTP and
//! storage. Inbound adapters call the driving ports in [`ports`]; the
//! services here implement them on top of the driven repository ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.
//! - Entities: [`User`], [`Recipe`], [`Tag`], [`Ingredient`].
//! - Policies: [`RecipeFilter`], [`IngredientFilter`], [`plan_toggle`].
//! - Services: [`RecipeService`], [`CatalogueService`], [`RelationService`],
//!   [`UserLoginService`].

pub mod auth;
pub mod error;
pub mod ids;
pub mod ingredient;
pub mod listing;
pub mod ports;
pub mod recipe;
pub mod recipe_filter;
pub mod relation;
pub mod subscription;
pub mod tag;
pub mod trace_id;
pub mod user;

mod catalogue_service;
mod port_errors;
mod recipe_service;
mod relation_service;
mod user_login_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::ids::{IngredientId, InvalidId, RecipeId, TagId, UserId};
pub use self::ingredient::{Ingredient, IngredientFilter};
pub use self::listing::Paged;
pub use self::recipe::{
    DraftIngredient, IngredientAmount, RECIPE_NAME_MAX_CHARS, RECIPE_NUMBER_MAX, Recipe,
    RecipeContent, RecipeDraft, RecipeIngredient, RecipePatch, RecipeSummary,
    RecipeValidationErrors, RecipeView,
};
pub use self::recipe_filter::{RecipeCriteria, RecipeFilter, parse_filter_flag};
pub use self::recipe_service::RecipeService;
pub use self::relation::{
    LinkState, LinkTransition, RelationConflict, RelationKind, ToggleAction, plan_toggle,
};
pub use self::relation_service::RelationService;
pub use self::subscription::AuthorSubscription;
pub use self::tag::Tag;
pub use self::trace_id::TraceId;
pub use self::user::User;
pub use self::user_login_service::UserLoginService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use recipes_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
