//! Driving port for the favorite, shopping-cart and subscription toggles.

use async_trait::async_trait;

use crate::domain::{AuthorSubscription, Error, RecipeId, RecipeSummary, RelationKind, UserId};

/// Relations whose target is a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeRelation {
    /// Favorites list.
    Favorite,
    /// Shopping cart.
    ShoppingCart,
}

impl From<RecipeRelation> for RelationKind {
    fn from(relation: RecipeRelation) -> Self {
        match relation {
            RecipeRelation::Favorite => Self::Favorite,
            RecipeRelation::ShoppingCart => Self::ShoppingCart,
        }
    }
}

/// Toggle endpoints. Every method rejects a repeated transition with a
/// `relationship_conflict` error and an unknown target with `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationsCommand: Send + Sync {
    /// Link `recipe` to `owner` and return its short representation.
    async fn link_recipe(
        &self,
        relation: RecipeRelation,
        owner: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove the link between `owner` and `recipe`.
    async fn unlink_recipe(
        &self,
        relation: RecipeRelation,
        owner: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error>;

    /// Subscribe `owner` to `author`. `recipes_limit` truncates the nested
    /// recipe list of the response.
    async fn subscribe(
        &self,
        owner: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<AuthorSubscription, Error>;

    /// Cancel the subscription of `owner` to `author`.
    async fn unsubscribe(&self, owner: UserId, author: UserId) -> Result<(), Error>;
}
