//! Driven port for recipe persistence.
//!
//! Adapters store a recipe together with its tag links and ingredient lines
//! and must replace all three atomically on update.
use async_trait::async_trait;

use crate::domain::{
    Paged, Recipe, RecipeContent, RecipeCriteria, RecipeId, RecipeSummary, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// A referenced author, tag or ingredient does not exist.
        MissingReference { message: String } => "recipe references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Recipes matching `criteria`, newest first (id descending), with the
    /// total match count.
    async fn list(
        &self,
        criteria: &RecipeCriteria,
        offset: u64,
        limit: u64,
    ) -> Result<Paged<Recipe>, RecipeRepositoryError>;

    /// Fetch a recipe with its author, tags and ingredients.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Insert a recipe authored by `author`, stamping `pub_date` now.
    async fn create(
        &self,
        author: UserId,
        content: &RecipeContent,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Replace the content of an existing recipe. Returns `None` when the
    /// recipe does not exist.
    async fn update(
        &self,
        id: RecipeId,
        content: &RecipeContent,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete a recipe and every row referencing it. Returns whether a row
    /// was removed.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Summaries of `author`'s recipes, newest first, truncated to `limit`.
    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError>;

    /// Number of recipes written by `author`.
    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError>;
}
