//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and by the test suites. The store
//! mirrors the PostgreSQL constraints that matter to the domain: unique
//! relation pairs, no self-subscription, existing references and cascading
//! recipe deletes.

mod repositories;


use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::{
    Ingredient, IngredientAmount, IngredientId, Recipe, RecipeId, RecipeIngredient, RelationKind,
    Tag, TagId, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredRecipe {
    author: UserId,
    name: String,
    image: String,
    text: String,
    cooking_time: u32,
    pub_date: DateTime<Utc>,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientAmount>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    tags: BTreeMap<TagId, Tag>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    links: HashMap<RelationKind, BTreeSet<(UserId, i64)>>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn links(&self, kind: RelationKind) -> impl Iterator<Item = &(UserId, i64)> {
        self.links.get(&kind).into_iter().flatten()
    }

    fn materialise(&self, id: RecipeId, stored: &StoredRecipe) -> Option<Recipe> {
        let author = self.users.get(&stored.author)?.clone();
        let mut tags: Vec<Tag> = stored
            .tags
            .iter()
            .filter_map(|tag| self.tags.get(tag).cloned())
            .collect();
        tags.sort_by_key(|tag| tag.id);
        let mut ingredients: Vec<RecipeIngredient> = stored
            .ingredients
            .iter()
            .filter_map(|line| {
                self.ingredients.get(&line.ingredient).map(|ingredient| RecipeIngredient {
                    ingredient: ingredient.clone(),
                    amount: line.amount,
                })
            })
            .collect();
        ingredients.sort_by_key(|line| line.ingredient.id);
        Some(Recipe {
            id,
            author,
            name: stored.name.clone(),
            image: stored.image.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            pub_date: stored.pub_date,
            tags,
            ingredients,
        })
    }
}

/// Mutex-guarded store shared by all in-memory repositories.
///
/// Identifiers come from one counter, so ids are unique across entity kinds.
///
/// # Examples
/// ```
/// use recipes_backend::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// let cook = store.add_user("cook@example.com", "cook", "Ada", "Cook");
/// assert_eq!(cook.id.get(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the login account (user 1) and a small
    /// catalogue of tags and ingredients.
    #[must_use]
    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.add_user("admin@example.com", "admin", "Admin", "User");
        store.add_tag("Breakfast", "#E26C2D", "breakfast");
        store.add_tag("Lunch", "#49B64E", "lunch");
        store.add_tag("Dinner", "#8775D2", "dinner");
        store.add_ingredient("Flour", "g");
        store.add_ingredient("Milk", "ml");
        store.add_ingredient("Eggs", "pcs");
        store.add_ingredient("Sugar", "g");
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user account.
    pub fn add_user(&self, email: &str, username: &str, first_name: &str, last_name: &str) -> User {
        let mut state = self.lock();
        let user = User {
            id: UserId::new(state.next_id()),
            email: email.to_owned(),
            username: username.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        };
        state.users.insert(user.id, user.clone());
        user
    }

    /// Register a tag.
    pub fn add_tag(&self, name: &str, color: &str, slug: &str) -> Tag {
        let mut state = self.lock();
        let tag = Tag {
            id: TagId::new(state.next_id()),
            name: name.to_owned(),
            color: color.to_owned(),
            slug: slug.to_owned(),
        };
        state.tags.insert(tag.id, tag.clone());
        tag
    }

    /// Register an ingredient.
    pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> Ingredient {
        let mut state = self.lock();
        let ingredient = Ingredient {
            id: IngredientId::new(state.next_id()),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        state.ingredients.insert(ingredient.id, ingredient.clone());
        ingredient
    }

    /// Look a user up by login handle.
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.lock()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    /// Number of stored rows for `kind`.
    #[must_use]
    pub fn relation_count(&self, kind: RelationKind) -> usize {
        self.lock().links(kind).count()
    }

    /// Number of stored recipes.
    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.lock().recipes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_are_shared_across_kinds() {
        let store = MemoryStore::new();
        let user = store.add_user("a@example.com", "a", "A", "A");
        let tag = store.add_tag("Soup", "#000000", "soup");
        let ingredient = store.add_ingredient("Salt", "g");
        assert_eq!(
            (user.id.get(), tag.id.get(), ingredient.id.get()),
            (1, 2, 3)
        );
    }

    #[rstest]
    fn defaults_include_the_login_account() {
        let store = MemoryStore::with_defaults();
        let state = store.lock();
        assert_eq!(
            state.users.get(&UserId::new(1)).map(|user| user.username.as_str()),
            Some("admin")
        );
        assert_eq!(state.tags.len(), 3);
    }

    #[rstest]
    fn users_are_found_by_username() {
        let store = MemoryStore::with_defaults();
        let cook = store.add_user("cook@example.com", "cook", "Ada", "Cook");
        assert_eq!(store.user_by_username("cook"), Some(cook));
        assert_eq!(store.user_by_username("nobody"), None);
    }
}
