//! PostgreSQL-backed `RecipeRepository`.
//!
//! A recipe spans three tables (`recipes`, `recipe_tags`,
//! `recipe_ingredients`); writes touch all three inside one transaction and
//! reads hydrate authors, tags and ingredients with one query each.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Ingredient, Paged, Recipe, RecipeContent, RecipeCriteria, RecipeId, RecipeIngredient,
    RecipeSummary, Tag, User, UserId,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeRow,
    RecipeSummaryRow, RecipeUpdate, TagRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts, tags, users,
};

/// Diesel implementation of [`RecipeRepository`].
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    RecipeRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => RecipeRepositoryError::connection(message),
        DieselFailure::Query(message) => RecipeRepositoryError::query(message),
        DieselFailure::ForeignKeyViolation(constraint) => {
            RecipeRepositoryError::missing_reference(constraint)
        }
        DieselFailure::UniqueViolation | DieselFailure::CheckViolation => {
            RecipeRepositoryError::query("recipe violates a table constraint")
        }
    }
}

fn to_db_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_db_number(value: u32) -> Result<i32, RecipeRepositoryError> {
    i32::try_from(value).map_err(|_| RecipeRepositoryError::query("number exceeds column range"))
}

/// Recipes matching `criteria`, unordered and unpaginated.
fn filtered(criteria: &RecipeCriteria) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = criteria.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }
    if !criteria.tag_slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(criteria.tag_slugs.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }
    if let Some(user) = criteria.favorited_by {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(user.get()))
            .select(favorites::recipe_id);
        query = query.filter(recipes::id.eq_any(favorited));
    }
    if let Some(user) = criteria.in_cart_of {
        let in_cart = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user.get()))
            .select(shopping_carts::recipe_id);
        query = query.filter(recipes::id.eq_any(in_cart));
    }
    query
}

/// Rows needed to build domain recipes.
struct RecipeParts {
    rows: Vec<RecipeRow>,
    authors: Vec<UserRow>,
    tags: Vec<(i64, TagRow)>,
    ingredients: Vec<(i64, i32, IngredientRow)>,
}

async fn load_parts(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> QueryResult<RecipeParts> {
    if rows.is_empty() {
        return Ok(RecipeParts {
            rows,
            authors: Vec::new(),
            tags: Vec::new(),
            ingredients: Vec::new(),
        });
    }
    let recipe_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let author_ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();

    let authors: Vec<UserRow> = users::table
        .filter(users::id.eq_any(author_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await?;
    let tags: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids.clone()))
        .order_by(tags::id)
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;
    let ingredients: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order_by(ingredients::id)
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await?;

    Ok(RecipeParts {
        rows,
        authors,
        tags,
        ingredients,
    })
}

fn assemble(parts: RecipeParts) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    let authors: HashMap<i64, User> = parts
        .authors
        .into_iter()
        .map(|row| (row.id, User::from(row)))
        .collect();
    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in parts.tags {
        tags_by_recipe.entry(recipe_id).or_default().push(Tag::from(row));
    }
    let mut lines_by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, row) in parts.ingredients {
        let amount = u32::try_from(amount)
            .map_err(|_| RecipeRepositoryError::query("stored amount out of range"))?;
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredient {
                ingredient: Ingredient::from(row),
                amount,
            });
    }

    parts
        .rows
        .into_iter()
        .map(|row| {
            let author = authors
                .get(&row.author_id)
                .cloned()
                .ok_or_else(|| RecipeRepositoryError::query("recipe author row missing"))?;
            let cooking_time = u32::try_from(row.cooking_time)
                .map_err(|_| RecipeRepositoryError::query("stored cooking time out of range"))?;
            Ok(Recipe {
                id: RecipeId::new(row.id),
                author,
                name: row.name,
                image: row.image,
                text: row.text,
                cooking_time,
                pub_date: row.pub_date,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                ingredients: lines_by_recipe.remove(&row.id).unwrap_or_default(),
            })
        })
        .collect()
}

fn single(parts: RecipeParts) -> Result<Recipe, RecipeRepositoryError> {
    assemble(parts)?
        .pop()
        .ok_or_else(|| RecipeRepositoryError::query("recipe row missing after write"))
}

/// Tag ids and `(ingredient, amount)` lines in column types.
struct Links {
    tags: Vec<i64>,
    ingredients: Vec<(i64, i32)>,
}

impl Links {
    fn from_content(content: &RecipeContent) -> Result<Self, RecipeRepositoryError> {
        let ingredients = content
            .ingredients
            .iter()
            .map(|line| Ok((line.ingredient.get(), to_db_number(line.amount)?)))
            .collect::<Result<_, RecipeRepositoryError>>()?;
        Ok(Self {
            tags: content.tags.iter().map(|tag| tag.get()).collect(),
            ingredients,
        })
    }

    async fn insert(&self, conn: &mut AsyncPgConnection, recipe_id: i64) -> QueryResult<()> {
        let tag_rows: Vec<NewRecipeTagRow> = self
            .tags
            .iter()
            .map(|tag_id| NewRecipeTagRow {
                recipe_id,
                tag_id: *tag_id,
            })
            .collect();
        if !tag_rows.is_empty() {
            diesel::insert_into(recipe_tags::table)
                .values(&tag_rows)
                .execute(conn)
                .await?;
        }
        let ingredient_rows: Vec<NewRecipeIngredientRow> = self
            .ingredients
            .iter()
            .map(|(ingredient_id, amount)| NewRecipeIngredientRow {
                recipe_id,
                ingredient_id: *ingredient_id,
                amount: *amount,
            })
            .collect();
        if !ingredient_rows.is_empty() {
            diesel::insert_into(recipe_ingredients::table)
                .values(&ingredient_rows)
                .execute(conn)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        criteria: &RecipeCriteria,
        offset: u64,
        limit: u64,
    ) -> Result<Paged<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(criteria)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeRow> = filtered(criteria)
            .select(RecipeRow::as_select())
            .order_by(recipes::id.desc())
            .offset(to_db_count(offset))
            .limit(to_db_count(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let parts = load_parts(&mut conn, rows).await.map_err(map_diesel_error)?;
        Ok(Paged {
            total: u64::try_from(total).unwrap_or_default(),
            items: assemble(parts)?,
        })
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let parts = load_parts(&mut conn, vec![row])
            .await
            .map_err(map_diesel_error)?;
        single(parts).map(Some)
    }

    async fn create(
        &self,
        author: UserId,
        content: &RecipeContent,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let links = Links::from_content(content)?;
        let new_row = NewRecipeRow {
            author_id: author.get(),
            name: &content.name,
            image: &content.image,
            text: &content.text,
            cooking_time: to_db_number(content.cooking_time)?,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let parts = conn
            .transaction(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    links.insert(conn, row.id).await?;
                    load_parts(conn, vec![row]).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        single(parts)
    }

    async fn update(
        &self,
        id: RecipeId,
        content: &RecipeContent,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let links = Links::from_content(content)?;
        let changes = RecipeUpdate {
            name: &content.name,
            image: &content.image,
            text: &content.text,
            cooking_time: to_db_number(content.cooking_time)?,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let parts = conn
            .transaction(|conn| {
                async move {
                    let updated: Option<RecipeRow> = diesel::update(recipes::table.find(id.get()))
                        .set(&changes)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                    let Some(row) = updated else {
                        return Ok(None);
                    };
                    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(row.id)))
                        .execute(conn)
                        .await?;
                    diesel::delete(
                        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(row.id)),
                    )
                    .execute(conn)
                    .await?;
                    links.insert(conn, row.id).await?;
                    load_parts(conn, vec![row]).await.map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        parts.map(single).transpose()
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .order_by(recipes::id.desc())
            .select(RecipeSummaryRow::as_select())
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(to_db_count(limit));
        }
        let rows: Vec<RecipeSummaryRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                row.into_summary()
                    .ok_or_else(|| RecipeRepositoryError::query("stored cooking time out of range"))
            })
            .collect()
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IngredientAmount, IngredientId, TagId};
    use rstest::rstest;

    #[rstest]
    fn links_convert_to_column_types() {
        let content = RecipeContent {
            name: "Tea".to_owned(),
            image: "img".to_owned(),
            text: "Steep.".to_owned(),
            cooking_time: 4,
            tags: vec![TagId::new(2), TagId::new(3)],
            ingredients: vec![IngredientAmount {
                ingredient: IngredientId::new(9),
                amount: 250,
            }],
        };
        let links = Links::from_content(&content).expect("links");
        assert_eq!(links.tags, vec![2, 3]);
        assert_eq!(links.ingredients, vec![(9, 250)]);
    }

    #[rstest]
    fn oversized_numbers_are_rejected() {
        assert!(to_db_number(u32::MAX).is_err());
        assert_eq!(to_db_count(u64::MAX), i64::MAX);
    }

    #[rstest]
    fn missing_rows_map_to_query_errors() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(error, RecipeRepositoryError::query("record not found"));
    }
}
