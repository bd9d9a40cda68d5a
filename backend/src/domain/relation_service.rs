//! Favorite, shopping-cart and subscription toggles plus the subscription
//! listing.
//!
//! The existence check before a write only produces the friendly conflict
//! message. Storage constraints stay authoritative: a duplicate insert or an
//! empty delete lost to a concurrent request is reported as the same
//! conflict.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::info;

use crate::domain::port_errors::relation_error;
use crate::domain::ports::{
    RecipeRelation, RecipeRepository, RelationRepository, RelationsCommand, SubscriptionsQuery,
    UserRepository,
};
use crate::domain::{
    AuthorSubscription, Error, LinkState, LinkTransition, Paged, RecipeId, RecipeSummary,
    RelationConflict, RelationKind, ToggleAction, User, UserId, plan_toggle,
};

/// Relation service implementing [`RelationsCommand`] and
/// [`SubscriptionsQuery`].
#[derive(Clone)]
pub struct RelationService<L, R, U> {
    relations: Arc<L>,
    recipes: Arc<R>,
    users: Arc<U>,
}

impl<L, R, U> RelationService<L, R, U> {
    /// Create a service over the given repositories.
    pub fn new(relations: Arc<L>, recipes: Arc<R>, users: Arc<U>) -> Self {
        Self {
            relations,
            recipes,
            users,
        }
    }
}

impl<L, R, U> RelationService<L, R, U>
where
    L: RelationRepository,
    R: RecipeRepository,
    U: UserRepository,
{
    async fn toggle(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
        action: ToggleAction,
        targets_self: bool,
    ) -> Result<(), Error> {
        let exists = self
            .relations
            .exists(kind, owner, target)
            .await
            .map_err(|err| relation_error(kind, err))?;
        let transition = plan_toggle(kind, LinkState::from_exists(exists), action, targets_self)?;
        match transition {
            LinkTransition::Insert => self
                .relations
                .create(kind, owner, target)
                .await
                .map_err(|err| relation_error(kind, err))?,
            LinkTransition::Remove => {
                let removed = self
                    .relations
                    .delete(kind, owner, target)
                    .await
                    .map_err(|err| relation_error(kind, err))?;
                if !removed {
                    return Err(RelationConflict::NotLinked(kind).into());
                }
            }
        }
        info!(
            relation = kind.as_str(),
            owner = owner.get(),
            target,
            ?transition,
            "relation toggled"
        );
        Ok(())
    }

    async fn recipe_summary(&self, id: RecipeId) -> Result<RecipeSummary, Error> {
        self.recipes
            .find_by_id(id)
            .await?
            .map(|recipe| recipe.summary())
            .ok_or_else(|| Error::not_found("recipe not found"))
    }

    async fn existing_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn describe_author(
        &self,
        author: User,
        recipes_limit: Option<u32>,
    ) -> Result<AuthorSubscription, Error> {
        let recipes = self
            .recipes
            .summaries_by_author(author.id, recipes_limit.map(u64::from))
            .await?;
        let recipes_count = self.recipes.count_by_author(author.id).await?;
        Ok(AuthorSubscription {
            author,
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl<L, R, U> RelationsCommand for RelationService<L, R, U>
where
    L: RelationRepository,
    R: RecipeRepository,
    U: UserRepository,
{
    async fn link_recipe(
        &self,
        relation: RecipeRelation,
        owner: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let summary = self.recipe_summary(recipe).await?;
        self.toggle(relation.into(), owner, recipe.get(), ToggleAction::Link, false)
            .await?;
        Ok(summary)
    }

    async fn unlink_recipe(
        &self,
        relation: RecipeRelation,
        owner: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        self.recipe_summary(recipe).await?;
        self.toggle(relation.into(), owner, recipe.get(), ToggleAction::Unlink, false)
            .await
    }

    async fn subscribe(
        &self,
        owner: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<AuthorSubscription, Error> {
        let followed = self.existing_user(author).await?;
        self.toggle(
            RelationKind::Subscription,
            owner,
            author.get(),
            ToggleAction::Link,
            owner == author,
        )
        .await?;
        self.describe_author(followed, recipes_limit).await
    }

    async fn unsubscribe(&self, owner: UserId, author: UserId) -> Result<(), Error> {
        self.existing_user(author).await?;
        self.toggle(
            RelationKind::Subscription,
            owner,
            author.get(),
            ToggleAction::Unlink,
            owner == author,
        )
        .await
    }
}

#[async_trait]
impl<L, R, U> SubscriptionsQuery for RelationService<L, R, U>
where
    L: RelationRepository,
    R: RecipeRepository,
    U: UserRepository,
{
    async fn list_subscriptions(
        &self,
        owner: UserId,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Paged<AuthorSubscription>, Error> {
        let kind = RelationKind::Subscription;
        let targets = self
            .relations
            .list_targets(kind, owner, page.offset(), page.limit())
            .await
            .map_err(|err| relation_error(kind, err))?;
        let ids: Vec<UserId> = targets.items.iter().copied().map(UserId::new).collect();
        let authors = if ids.is_empty() {
            Vec::new()
        } else {
            self.users.find_by_ids(&ids).await?
        };

        let mut items = Vec::with_capacity(authors.len());
        for author in authors {
            items.push(self.describe_author(author, recipes_limit).await?);
        }
        Ok(Paged {
            total: targets.total,
            items,
        })
    }
}

#[cfg(test)]
#[path = "relation_service_tests.rs"]
mod tests;
