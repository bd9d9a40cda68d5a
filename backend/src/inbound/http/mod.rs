//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod query;
pub mod recipes;
pub mod relations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller owns the scope, its session middleware and the shared
/// [`state::HttpState`].
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::login)
        .service(users::list_subscriptions)
        .service(catalogue::list_tags)
        .service(catalogue::get_tag)
        .service(catalogue::list_ingredients)
        .service(catalogue::get_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(relations::add_favorite)
        .service(relations::remove_favorite)
        .service(relations::add_to_shopping_cart)
        .service(relations::remove_from_shopping_cart)
        .service(relations::subscribe)
        .service(relations::unsubscribe);
}
