//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipePatch, RecipeView, UserId};

/// Authenticated recipe mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Validate and store a recipe authored by `author`.
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft)
    -> Result<RecipeView, Error>;

    /// Apply `patch` to a recipe owned by `actor`.
    ///
    /// `not_found` when the recipe is absent, `forbidden` when `actor` is
    /// not its author.
    async fn update_recipe(
        &self,
        actor: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe owned by `actor`.
    async fn delete_recipe(&self, actor: UserId, id: RecipeId) -> Result<(), Error>;
}
