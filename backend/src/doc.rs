//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and the probes, the request
//! and response bodies, and the session cookie security scheme. Domain types
//! are documented through the wrappers in
//! [`crate::inbound::http::schemas`].
//!
//! Swagger UI serves the document in debug builds; `openapi-dump` prints it.

use crate::inbound::http::catalogue::{IngredientResponse, TagResponse};
use crate::inbound::http::recipes::{
    DisplayRecipe, EditableRecipe, IngredientAmountRequest, RecipeIngredientResponse,
    RecipePage, RecipePatchRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    AuthorResponse, LoginRequest, ShortRecipe, SubscriptionPage, SubscriptionResponse,
};
use crate::server::SESSION_COOKIE_NAME;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipes backend API",
        description = "Recipe catalogue with favourites, shopping carts and author subscriptions.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_subscriptions,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::relations::add_favorite,
        crate::inbound::http::relations::remove_favorite,
        crate::inbound::http::relations::add_to_shopping_cart,
        crate::inbound::http::relations::remove_from_shopping_cart,
        crate::inbound::http::relations::subscribe,
        crate::inbound::http::relations::unsubscribe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        TagResponse,
        IngredientResponse,
        DisplayRecipe,
        EditableRecipe,
        RecipePatchRequest,
        IngredientAmountRequest,
        RecipeIngredientResponse,
        RecipePage,
        ShortRecipe,
        AuthorResponse,
        SubscriptionResponse,
        SubscriptionPage,
        LoginRequest,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "users", description = "Login and subscription listings"),
        (name = "catalogue", description = "Tags and ingredients"),
        (name = "recipes", description = "Recipe reads and authoring"),
        (name = "relations", description = "Favourites, shopping cart and subscriptions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
