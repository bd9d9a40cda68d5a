//! Tag and ingredient reads.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository};
use crate::domain::{Error, Ingredient, IngredientFilter, IngredientId, Tag, TagId};

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    /// Create a service over the given repository.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(self.catalogue.list_tags().await?)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error> {
        self.catalogue
            .find_tag(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn list_ingredients(&self, filter: IngredientFilter) -> Result<Vec<Ingredient>, Error> {
        Ok(self.catalogue.list_ingredients(&filter).await?)
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.catalogue
            .find_ingredient(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
