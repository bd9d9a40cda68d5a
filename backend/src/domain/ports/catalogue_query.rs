//! Driving port for tag and ingredient reads.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientFilter, IngredientId, Tag, TagId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every tag, ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// One tag; `not_found` when absent.
    async fn get_tag(&self, id: TagId) -> Result<Tag, Error>;

    /// Ingredients matching `filter`, ordered by id.
    async fn list_ingredients(&self, filter: IngredientFilter) -> Result<Vec<Ingredient>, Error>;

    /// One ingredient; `not_found` when absent.
    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
