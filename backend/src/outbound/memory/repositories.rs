//! Port implementations for [`MemoryStore`].

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, RecipeRepository, RecipeRepositoryError,
    RelationRepository, RelationRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Ingredient, IngredientFilter, IngredientId, Paged, Recipe, RecipeContent, RecipeCriteria,
    RecipeId, RecipeSummary, RelationKind, Tag, TagId, User, UserId,
};

use super::{MemoryStore, State, StoredRecipe};

fn window<T>(items: Vec<T>, offset: u64, limit: u64) -> Paged<T> {
    let total = items.len() as u64;
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    Paged {
        total,
        items: items.into_iter().skip(skip).take(take).collect(),
    }
}

impl State {
    fn is_linked(&self, kind: RelationKind, owner: UserId, target: i64) -> bool {
        self.links
            .get(&kind)
            .is_some_and(|pairs| pairs.contains(&(owner, target)))
    }

    fn matches(&self, id: RecipeId, stored: &StoredRecipe, criteria: &RecipeCriteria) -> bool {
        if criteria.author.is_some_and(|author| author != stored.author) {
            return false;
        }
        if !criteria.tag_slugs.is_empty() {
            let tagged = stored.tags.iter().any(|tag| {
                self.tags
                    .get(tag)
                    .is_some_and(|tag| criteria.tag_slugs.contains(&tag.slug))
            });
            if !tagged {
                return false;
            }
        }
        let in_relation = |kind, owner: Option<UserId>| {
            owner.is_none_or(|owner| self.is_linked(kind, owner, id.get()))
        };
        in_relation(RelationKind::Favorite, criteria.favorited_by)
            && in_relation(RelationKind::ShoppingCart, criteria.in_cart_of)
    }

    fn check_references(&self, author: UserId, content: &RecipeContent) -> Result<(), String> {
        if !self.users.contains_key(&author) {
            return Err(format!("user {author}"));
        }
        if let Some(tag) = content.tags.iter().find(|tag| !self.tags.contains_key(tag)) {
            return Err(format!("tag {tag}"));
        }
        if let Some(line) = content
            .ingredients
            .iter()
            .find(|line| !self.ingredients.contains_key(&line.ingredient))
        {
            return Err(format!("ingredient {}", line.ingredient));
        }
        Ok(())
    }

    fn target_exists(&self, kind: RelationKind, target: i64) -> bool {
        match kind {
            RelationKind::Subscription => self.users.contains_key(&UserId::new(target)),
            RelationKind::Favorite | RelationKind::ShoppingCart => {
                self.recipes.contains_key(&RecipeId::new(target))
            }
        }
    }

    fn summaries_by(&self, author: UserId) -> Vec<RecipeSummary> {
        self.recipes
            .iter()
            .rev()
            .filter(|(_, stored)| stored.author == author)
            .map(|(id, stored)| RecipeSummary {
                id: *id,
                name: stored.name.clone(),
                image: stored.image.clone(),
                cooking_time: stored.cooking_time,
            })
            .collect()
    }
}

fn store_content(stored: &mut StoredRecipe, content: &RecipeContent) {
    stored.name.clone_from(&content.name);
    stored.image.clone_from(&content.image);
    stored.text.clone_from(&content.text);
    stored.cooking_time = content.cooking_time;
    stored.tags.clone_from(&content.tags);
    stored.ingredients.clone_from(&content.ingredients);
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock();
        Ok(state
            .users
            .values()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogueRepository for MemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        Ok(self.lock().tags.values().cloned().collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        Ok(self.lock().tags.get(&id).cloned())
    }

    async fn list_ingredients(
        &self,
        filter: &IngredientFilter,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .values()
            .filter(|ingredient| filter.matches(ingredient))
            .cloned()
            .collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self.lock().ingredients.get(&id).cloned())
    }

    async fn existing_tag_ids(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        let state = self.lock();
        Ok(state.tags.keys().filter(|id| ids.contains(id)).copied().collect())
    }

    async fn existing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        let state = self.lock();
        Ok(state
            .ingredients
            .keys()
            .filter(|id| ids.contains(id))
            .copied()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn list(
        &self,
        criteria: &RecipeCriteria,
        offset: u64,
        limit: u64,
    ) -> Result<Paged<Recipe>, RecipeRepositoryError> {
        let state = self.lock();
        let matching: Vec<Recipe> = state
            .recipes
            .iter()
            .rev()
            .filter(|(id, stored)| state.matches(**id, stored, criteria))
            .filter_map(|(id, stored)| state.materialise(*id, stored))
            .collect();
        Ok(window(matching, offset, limit))
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .get(&id)
            .and_then(|stored| state.materialise(id, stored)))
    }

    async fn create(
        &self,
        author: UserId,
        content: &RecipeContent,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock();
        state
            .check_references(author, content)
            .map_err(RecipeRepositoryError::missing_reference)?;
        let id = RecipeId::new(state.next_id());
        let mut stored = StoredRecipe {
            author,
            name: String::new(),
            image: String::new(),
            text: String::new(),
            cooking_time: 0,
            pub_date: Utc::now(),
            tags: Vec::new(),
            ingredients: Vec::new(),
        };
        store_content(&mut stored, content);
        let recipe = state
            .materialise(id, &stored)
            .ok_or_else(|| RecipeRepositoryError::query("created recipe could not be read back"))?;
        state.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn update(
        &self,
        id: RecipeId,
        content: &RecipeContent,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.lock();
        let Some(author) = state.recipes.get(&id).map(|stored| stored.author) else {
            return Ok(None);
        };
        state
            .check_references(author, content)
            .map_err(RecipeRepositoryError::missing_reference)?;
        let Some(mut stored) = state.recipes.get(&id).cloned() else {
            return Ok(None);
        };
        store_content(&mut stored, content);
        let recipe = state.materialise(id, &stored);
        state.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        if state.recipes.remove(&id).is_none() {
            return Ok(false);
        }
        for kind in [RelationKind::Favorite, RelationKind::ShoppingCart] {
            if let Some(pairs) = state.links.get_mut(&kind) {
                pairs.retain(|(_, target)| *target != id.get());
            }
        }
        Ok(true)
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let mut summaries = self.lock().summaries_by(author);
        if let Some(limit) = limit {
            summaries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(summaries)
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .values()
            .filter(|stored| stored.author == author)
            .count() as u64)
    }
}

#[async_trait]
impl RelationRepository for MemoryStore {
    async fn exists(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<bool, RelationRepositoryError> {
        Ok(self.lock().is_linked(kind, owner, target))
    }

    async fn create(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<(), RelationRepositoryError> {
        let mut state = self.lock();
        if kind == RelationKind::Subscription && owner.get() == target {
            return Err(RelationRepositoryError::self_reference());
        }
        if !state.users.contains_key(&owner) {
            return Err(RelationRepositoryError::missing_reference(format!("user {owner}")));
        }
        if !state.target_exists(kind, target) {
            return Err(RelationRepositoryError::missing_reference(format!(
                "{kind} target {target}"
            )));
        }
        if state.links.entry(kind).or_default().insert((owner, target)) {
            Ok(())
        } else {
            Err(RelationRepositoryError::duplicate())
        }
    }

    async fn delete(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<bool, RelationRepositoryError> {
        Ok(self
            .lock()
            .links
            .get_mut(&kind)
            .is_some_and(|pairs| pairs.remove(&(owner, target))))
    }

    async fn linked_targets(
        &self,
        kind: RelationKind,
        owner: UserId,
        targets: &[i64],
    ) -> Result<Vec<i64>, RelationRepositoryError> {
        let state = self.lock();
        Ok(state
            .links(kind)
            .filter(|(linked_owner, target)| *linked_owner == owner && targets.contains(target))
            .map(|(_, target)| *target)
            .collect())
    }

    async fn list_targets(
        &self,
        kind: RelationKind,
        owner: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Paged<i64>, RelationRepositoryError> {
        let state = self.lock();
        let targets: Vec<i64> = state
            .links(kind)
            .filter(|(linked_owner, _)| *linked_owner == owner)
            .map(|(_, target)| *target)
            .collect();
        Ok(window(targets, offset, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IngredientAmount;
    use rstest::{fixture, rstest};

    struct Seeded {
        store: MemoryStore,
        cook: User,
        guest: User,
        content: RecipeContent,
    }

    #[fixture]
    fn seeded() -> Seeded {
        let store = MemoryStore::new();
        let cook = store.add_user("cook@example.com", "cook", "Ada", "Cook");
        let guest = store.add_user("guest@example.com", "guest", "Bo", "Guest");
        let soup = store.add_tag("Soup", "#112233", "soup");
        let salt = store.add_ingredient("Salt", "g");
        let content = RecipeContent {
            name: "Broth".to_owned(),
            image: "img".to_owned(),
            text: "Boil.".to_owned(),
            cooking_time: 30,
            tags: vec![soup.id],
            ingredients: vec![IngredientAmount {
                ingredient: salt.id,
                amount: 5,
            }],
        };
        Seeded {
            store,
            cook,
            guest,
            content,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn listing_is_newest_first_and_windowed(seeded: Seeded) {
        for _ in 0..3 {
            RecipeRepository::create(&seeded.store, seeded.cook.id, &seeded.content)
                .await
                .expect("recipe");
        }
        let page = seeded
            .store
            .list(&RecipeCriteria::default(), 1, 1)
            .await
            .expect("page");
        assert_eq!(page.total, 3);
        let ids: Vec<i64> = page.items.iter().map(|recipe| recipe.id.get()).collect();
        assert_eq!(ids, vec![6]);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_and_self_links_are_rejected(seeded: Seeded) {
        let store = &seeded.store;
        let kind = RelationKind::Subscription;
        RelationRepository::create(store, kind, seeded.guest.id, seeded.cook.id.get())
            .await
            .expect("first");
        assert_eq!(
            RelationRepository::create(store, kind, seeded.guest.id, seeded.cook.id.get()).await,
            Err(RelationRepositoryError::Duplicate)
        );
        assert_eq!(
            RelationRepository::create(store, kind, seeded.cook.id, seeded.cook.id.get()).await,
            Err(RelationRepositoryError::SelfReference)
        );
        assert_eq!(store.relation_count(kind), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_recipe_cascades_to_links(seeded: Seeded) {
        let store = &seeded.store;
        let recipe = RecipeRepository::create(store, seeded.cook.id, &seeded.content)
            .await
            .expect("recipe");
        RelationRepository::create(store, RelationKind::Favorite, seeded.guest.id, recipe.id.get())
            .await
            .expect("favorite");

        assert!(RecipeRepository::delete(store, recipe.id).await.expect("delete"));
        assert_eq!(store.relation_count(RelationKind::Favorite), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_references_are_reported(seeded: Seeded) {
        let mut content = seeded.content.clone();
        content.tags.push(TagId::new(404));
        let error = RecipeRepository::create(&seeded.store, seeded.cook.id, &content)
            .await
            .expect_err("missing tag");
        assert!(matches!(error, RecipeRepositoryError::MissingReference { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn favorites_filter_narrows_listing(seeded: Seeded) {
        let store = &seeded.store;
        let first = RecipeRepository::create(store, seeded.cook.id, &seeded.content)
            .await
            .expect("recipe");
        RecipeRepository::create(store, seeded.cook.id, &seeded.content)
            .await
            .expect("recipe");
        RelationRepository::create(store, RelationKind::Favorite, seeded.guest.id, first.id.get())
            .await
            .expect("favorite");

        let criteria = RecipeCriteria {
            favorited_by: Some(seeded.guest.id),
            ..RecipeCriteria::default()
        };
        let page = store.list(&criteria, 0, 10).await.expect("page");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, first.id);
    }
}
