//! Driving port for recipe reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Paged, RecipeFilter, RecipeId, RecipeView, UserId};

/// Public recipe reads. `viewer` is `None` for anonymous requests and only
/// affects the relationship flags and the flag filters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    /// One page of recipes, newest first.
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Paged<RecipeView>, Error>;

    /// A single recipe; `not_found` when absent.
    async fn get_recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error>;
}
