//! Recipe commands and queries.
//!
//! Reads decorate each recipe with flags relative to the requester. Writes
//! validate the editable form, confirm every referenced tag and ingredient
//! exists, and enforce authorship for updates and deletes.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::info;

use crate::domain::port_errors::relation_error;
use crate::domain::ports::{
    CatalogueRepository, RecipeRepository, RecipesCommand, RecipesQuery, RelationRepository,
};
use crate::domain::{
    Error, IngredientId, Paged, Recipe, RecipeContent, RecipeDraft, RecipeFilter, RecipeId,
    RecipePatch, RecipeValidationErrors, RecipeView, RelationKind, TagId, UserId,
};

/// Recipe service implementing [`RecipesQuery`] and [`RecipesCommand`].
#[derive(Clone)]
pub struct RecipeService<R, C, L> {
    recipes: Arc<R>,
    catalogue: Arc<C>,
    relations: Arc<L>,
}

impl<R, C, L> RecipeService<R, C, L> {
    /// Create a service over the given repositories.
    pub fn new(recipes: Arc<R>, catalogue: Arc<C>, relations: Arc<L>) -> Self {
        Self {
            recipes,
            catalogue,
            relations,
        }
    }
}

impl<R, C, L> RecipeService<R, C, L>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    L: RelationRepository,
{
    async fn linked(
        &self,
        kind: RelationKind,
        viewer: UserId,
        targets: &[i64],
    ) -> Result<HashSet<i64>, Error> {
        if targets.is_empty() {
            return Ok(HashSet::new());
        }
        let linked = self
            .relations
            .linked_targets(kind, viewer, targets)
            .await
            .map_err(|err| relation_error(kind, err))?;
        Ok(linked.into_iter().collect())
    }

    async fn decorate(
        &self,
        viewer: Option<UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, Error> {
        let Some(viewer) = viewer else {
            return Ok(recipes
                .into_iter()
                .map(|recipe| RecipeView {
                    recipe,
                    author_is_subscribed: false,
                    is_favorited: false,
                    is_in_shopping_cart: false,
                })
                .collect());
        };

        let recipe_ids: Vec<i64> = recipes.iter().map(|recipe| recipe.id.get()).collect();
        let mut author_ids: Vec<i64> = recipes.iter().map(|recipe| recipe.author.id.get()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let favorites = self.linked(RelationKind::Favorite, viewer, &recipe_ids).await?;
        let cart = self.linked(RelationKind::ShoppingCart, viewer, &recipe_ids).await?;
        let followed = self.linked(RelationKind::Subscription, viewer, &author_ids).await?;

        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeView {
                author_is_subscribed: followed.contains(&recipe.author.id.get()),
                is_favorited: favorites.contains(&recipe.id.get()),
                is_in_shopping_cart: cart.contains(&recipe.id.get()),
                recipe,
            })
            .collect())
    }

    async fn decorate_one(&self, viewer: Option<UserId>, recipe: Recipe) -> Result<RecipeView, Error> {
        self.decorate(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("recipe view went missing"))
    }

    async fn validate_draft(&self, draft: RecipeDraft) -> Result<RecipeContent, Error> {
        let tags = draft.tags.clone();
        let ingredients: Vec<IngredientId> = draft.ingredients.iter().map(|item| item.id).collect();
        let (content, mut errors) = match draft.validate() {
            Ok(content) => (Some(content), RecipeValidationErrors::default()),
            Err(errors) => (None, errors),
        };
        self.check_references(&tags, &ingredients, &mut errors).await?;
        match content {
            Some(content) if errors.is_empty() => Ok(content),
            _ => Err(errors.into_error()),
        }
    }

    async fn check_references(
        &self,
        tags: &[TagId],
        ingredients: &[IngredientId],
        errors: &mut RecipeValidationErrors,
    ) -> Result<(), Error> {
        if !tags.is_empty() {
            let known: HashSet<TagId> =
                self.catalogue.existing_tag_ids(tags).await?.into_iter().collect();
            let mut reported = HashSet::new();
            for tag in tags.iter().filter(|tag| !known.contains(tag)) {
                if reported.insert(*tag) {
                    errors.push("tags", format!("tag {tag} does not exist"));
                }
            }
        }
        if !ingredients.is_empty() {
            let known: HashSet<IngredientId> = self
                .catalogue
                .existing_ingredient_ids(ingredients)
                .await?
                .into_iter()
                .collect();
            let mut reported = HashSet::new();
            for ingredient in ingredients.iter().filter(|id| !known.contains(id)) {
                if reported.insert(*ingredient) {
                    errors.push("ingredients", format!("ingredient {ingredient} does not exist"));
                }
            }
        }
        Ok(())
    }

    async fn owned_recipe(&self, actor: UserId, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("recipe not found"))?;
        if recipe.author.id != actor {
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(recipe)
    }
}

#[async_trait]
impl<R, C, L> RecipesQuery for RecipeService<R, C, L>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    L: RelationRepository,
{
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Paged<RecipeView>, Error> {
        let Some(criteria) = filter.resolve(viewer) else {
            return Ok(Paged::empty());
        };
        let found = self
            .recipes
            .list(&criteria, page.offset(), page.limit())
            .await?;
        let items = self.decorate(viewer, found.items).await?;
        Ok(Paged {
            total: found.total,
            items,
        })
    }

    async fn get_recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("recipe not found"))?;
        self.decorate_one(viewer, recipe).await
    }
}

#[async_trait]
impl<R, C, L> RecipesCommand for RecipeService<R, C, L>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    L: RelationRepository,
{
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        let content = self.validate_draft(draft).await?;
        let recipe = self.recipes.create(author, &content).await?;
        info!(recipe_id = recipe.id.get(), author = author.get(), "recipe created");
        Ok(RecipeView {
            recipe,
            author_is_subscribed: false,
            is_favorited: false,
            is_in_shopping_cart: false,
        })
    }

    async fn update_recipe(
        &self,
        actor: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, Error> {
        let current = self.owned_recipe(actor, id).await?;
        let content = self.validate_draft(patch.apply_to(current.to_draft())).await?;
        let recipe = self
            .recipes
            .update(id, &content)
            .await?
            .ok_or_else(|| Error::not_found("recipe not found"))?;
        info!(recipe_id = id.get(), author = actor.get(), "recipe updated");
        self.decorate_one(Some(actor), recipe).await
    }

    async fn delete_recipe(&self, actor: UserId, id: RecipeId) -> Result<(), Error> {
        self.owned_recipe(actor, id).await?;
        if !self.recipes.delete(id).await? {
            return Err(Error::not_found("recipe not found"));
        }
        info!(recipe_id = id.get(), author = actor.get(), "recipe deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
