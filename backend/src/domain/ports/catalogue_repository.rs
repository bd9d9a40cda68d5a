//! Driven port for the read-only tag and ingredient catalogue.
use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientFilter, IngredientId, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "catalogue query failed: {message}",
    }
}

/// Tags and ingredients. Both are reference data and never mutated here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Every tag, ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    /// A single tag.
    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    /// Ingredients passing `filter`, ordered by id.
    async fn list_ingredients(
        &self,
        filter: &IngredientFilter,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    /// A single ingredient.
    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    /// The subset of `ids` that exist.
    async fn existing_tag_ids(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError>;

    /// The subset of `ids` that exist.
    async fn existing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError>;
}
