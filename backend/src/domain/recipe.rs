//! Recipe aggregate, its editable form and the validation rules applied to it.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{Error, Ingredient, IngredientId, RecipeId, Tag, TagId, User};

/// Longest accepted recipe name, in characters.
pub const RECIPE_NAME_MAX_CHARS: usize = 200;

/// Largest value accepted for `cooking_time` and ingredient amounts.
pub const RECIPE_NUMBER_MAX: i64 = i32::MAX as i64;

/// Stored recipe with its tags and ingredients resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Primary key.
    pub id: RecipeId,
    /// Author; always the user who created the recipe.
    pub author: User,
    /// Title, at most [`RECIPE_NAME_MAX_CHARS`] characters.
    pub name: String,
    /// Opaque image reference.
    pub image: String,
    /// Preparation instructions.
    pub text: String,
    /// Minutes, at least 1.
    pub cooking_time: u32,
    /// Publication timestamp.
    pub pub_date: DateTime<Utc>,
    /// Tags ordered by id.
    pub tags: Vec<Tag>,
    /// Ingredients with amounts, ordered by ingredient id.
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Editable form of this recipe, used as the base for partial updates.
    #[must_use]
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.clone(),
            image: self.image.clone(),
            text: self.text.clone(),
            cooking_time: i64::from(self.cooking_time),
            tags: self.tags.iter().map(|tag| tag.id).collect(),
            ingredients: self
                .ingredients
                .iter()
                .map(|item| DraftIngredient {
                    id: item.ingredient.id,
                    amount: i64::from(item.amount),
                })
                .collect(),
        }
    }

    /// Short representation used by toggle responses and subscriptions.
    #[must_use]
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Referenced ingredient.
    pub ingredient: Ingredient,
    /// Quantity in the ingredient's measurement unit, at least 1.
    pub amount: u32,
}

/// Short recipe representation: `id`, `name`, `image`, `cooking_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    /// Primary key.
    pub id: RecipeId,
    /// Title.
    pub name: String,
    /// Opaque image reference.
    pub image: String,
    /// Minutes.
    pub cooking_time: u32,
}

/// Recipe enriched with flags relative to the requesting user.
///
/// All flags are `false` for anonymous requesters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    /// The recipe itself.
    pub recipe: Recipe,
    /// Whether the requester subscribes to the recipe's author.
    pub author_is_subscribed: bool,
    /// Whether the requester has favorited the recipe.
    pub is_favorited: bool,
    /// Whether the recipe is in the requester's shopping cart.
    pub is_in_shopping_cart: bool,
}

/// Ingredient reference in an editable recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftIngredient {
    /// Referenced ingredient.
    pub id: IngredientId,
    /// Requested amount; validated to be at least 1.
    pub amount: i64,
}

/// Unvalidated editable representation of a recipe.
///
/// There is deliberately no author field: the author is always the
/// requesting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Title.
    pub name: String,
    /// Opaque image reference.
    pub image: String,
    /// Preparation instructions.
    pub text: String,
    /// Minutes.
    pub cooking_time: i64,
    /// Tag ids.
    pub tags: Vec<TagId>,
    /// Ingredient ids with amounts.
    pub ingredients: Vec<DraftIngredient>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    /// Replacement title.
    pub name: Option<String>,
    /// Replacement image reference.
    pub image: Option<String>,
    /// Replacement instructions.
    pub text: Option<String>,
    /// Replacement cooking time.
    pub cooking_time: Option<i64>,
    /// Replacement tag set.
    pub tags: Option<Vec<TagId>>,
    /// Replacement ingredient list.
    pub ingredients: Option<Vec<DraftIngredient>>,
}

impl RecipePatch {
    /// Overlay the patch onto `base`.
    #[must_use]
    pub fn apply_to(self, base: RecipeDraft) -> RecipeDraft {
        RecipeDraft {
            name: self.name.unwrap_or(base.name),
            image: self.image.unwrap_or(base.image),
            text: self.text.unwrap_or(base.text),
            cooking_time: self.cooking_time.unwrap_or(base.cooking_time),
            tags: self.tags.unwrap_or(base.tags),
            ingredients: self.ingredients.unwrap_or(base.ingredients),
        }
    }
}

/// Validated recipe content ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeContent {
    /// Title.
    pub name: String,
    /// Opaque image reference.
    pub image: String,
    /// Preparation instructions.
    pub text: String,
    /// Minutes, at least 1.
    pub cooking_time: u32,
    /// Distinct tag ids in request order.
    pub tags: Vec<TagId>,
    /// Distinct ingredient ids with amounts in request order.
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated ingredient line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Referenced ingredient.
    pub ingredient: IngredientId,
    /// Quantity, at least 1.
    pub amount: u32,
}

/// Field-level validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl RecipeValidationErrors {
    /// Record a message against `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Whether no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded against `field`.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Convert into an `invalid_request` error with `details.fields`.
    #[must_use]
    pub fn into_error(self) -> Error {
        Error::invalid_request("recipe validation failed").with_details(json!({
            "fields": self.fields,
        }))
    }
}

impl RecipeDraft {
    /// Check every field rule and return the validated content.
    ///
    /// Catalogue existence of the referenced tags and ingredients is checked
    /// separately by the recipe service.
    ///
    /// # Errors
    /// Returns every violated rule, grouped by field.
    pub fn validate(self) -> Result<RecipeContent, RecipeValidationErrors> {
        let mut errors = RecipeValidationErrors::default();

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.push("name", "must not be empty");
        } else if name.chars().count() > RECIPE_NAME_MAX_CHARS {
            errors.push(
                "name",
                format!("must be at most {RECIPE_NAME_MAX_CHARS} characters"),
            );
        }
        if self.text.trim().is_empty() {
            errors.push("text", "must not be empty");
        }
        if self.image.trim().is_empty() {
            errors.push("image", "must not be empty");
        }
        let cooking_time = bounded_positive(self.cooking_time);
        if cooking_time.is_none() {
            errors.push("cooking_time", "must be at least 1");
        }

        check_tags(&self.tags, &mut errors);
        let ingredients = check_ingredients(&self.ingredients, &mut errors);

        match cooking_time {
            Some(minutes) if errors.is_empty() => Ok(RecipeContent {
                name,
                image: self.image,
                text: self.text,
                cooking_time: minutes,
                tags: self.tags,
                ingredients,
            }),
            _ => Err(errors),
        }
    }
}

fn bounded_positive(value: i64) -> Option<u32> {
    if (1..=RECIPE_NUMBER_MAX).contains(&value) {
        u32::try_from(value).ok()
    } else {
        None
    }
}

fn check_tags(tags: &[TagId], errors: &mut RecipeValidationErrors) {
    if tags.is_empty() {
        errors.push("tags", "at least one tag is required");
        return;
    }
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(*tag) {
            errors.push("tags", format!("tag {tag} is listed more than once"));
        }
    }
}

fn check_ingredients(
    items: &[DraftIngredient],
    errors: &mut RecipeValidationErrors,
) -> Vec<IngredientAmount> {
    if items.is_empty() {
        errors.push("ingredients", "at least one ingredient is required");
        return Vec::new();
    }
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            errors.push(
                "ingredients",
                format!("ingredient {} is listed more than once", item.id),
            );
        }
        match bounded_positive(item.amount) {
            Some(amount) => validated.push(IngredientAmount {
                ingredient: item.id,
                amount,
            }),
            None => errors.push(
                "ingredients",
                format!("amount for ingredient {} must be at least 1", item.id),
            ),
        }
    }
    validated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Pancakes".to_owned(),
            image: "data:image/png;base64,AAAA".to_owned(),
            text: "Mix and fry.".to_owned(),
            cooking_time: 20,
            tags: vec![TagId::new(1), TagId::new(2)],
            ingredients: vec![
                DraftIngredient {
                    id: IngredientId::new(10),
                    amount: 200,
                },
                DraftIngredient {
                    id: IngredientId::new(11),
                    amount: 2,
                },
            ],
        }
    }

    #[rstest]
    fn accepts_valid_draft(draft: RecipeDraft) {
        let content = draft.validate().expect("valid draft");
        assert_eq!(content.cooking_time, 20);
        assert_eq!(content.ingredients.len(), 2);
        assert_eq!(content.tags, vec![TagId::new(1), TagId::new(2)]);
    }

    #[rstest]
    #[case::empty_name(|d: &mut RecipeDraft| d.name = "  ".to_owned(), "name")]
    #[case::long_name(|d: &mut RecipeDraft| d.name = "x".repeat(201), "name")]
    #[case::empty_text(|d: &mut RecipeDraft| d.text = String::new(), "text")]
    #[case::empty_image(|d: &mut RecipeDraft| d.image = String::new(), "image")]
    #[case::zero_time(|d: &mut RecipeDraft| d.cooking_time = 0, "cooking_time")]
    #[case::huge_time(|d: &mut RecipeDraft| d.cooking_time = i64::MAX, "cooking_time")]
    #[case::no_tags(|d: &mut RecipeDraft| d.tags.clear(), "tags")]
    #[case::duplicate_tags(|d: &mut RecipeDraft| d.tags.push(TagId::new(1)), "tags")]
    #[case::no_ingredients(|d: &mut RecipeDraft| d.ingredients.clear(), "ingredients")]
    #[case::duplicate_ingredients(
        |d: &mut RecipeDraft| d.ingredients.push(DraftIngredient { id: IngredientId::new(10), amount: 1 }),
        "ingredients"
    )]
    #[case::zero_amount(|d: &mut RecipeDraft| d.ingredients[0].amount = 0, "ingredients")]
    fn reports_field_errors(
        draft: RecipeDraft,
        #[case] mutate: fn(&mut RecipeDraft),
        #[case] field: &str,
    ) {
        let mut invalid = draft;
        mutate(&mut invalid);
        let errors = invalid.validate().expect_err("invalid draft");
        assert!(
            !errors.messages(field).is_empty(),
            "expected a message for {field}, got {errors:?}"
        );
    }

    #[rstest]
    fn name_of_exactly_max_length_is_accepted(draft: RecipeDraft) {
        let mut long = draft;
        long.name = "é".repeat(RECIPE_NAME_MAX_CHARS);
        assert!(long.validate().is_ok());
    }

    #[rstest]
    fn patch_keeps_unspecified_fields(draft: RecipeDraft) {
        let patch = RecipePatch {
            name: Some("Crêpes".to_owned()),
            cooking_time: Some(15),
            ..RecipePatch::default()
        };
        let merged = patch.apply_to(draft.clone());
        assert_eq!(merged.name, "Crêpes");
        assert_eq!(merged.cooking_time, 15);
        assert_eq!(merged.tags, draft.tags);
        assert_eq!(merged.ingredients, draft.ingredients);
    }

    #[rstest]
    fn validation_errors_render_field_details() {
        let mut errors = RecipeValidationErrors::default();
        errors.push("name", "must not be empty");
        let error = errors.into_error();
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "fields": { "name": ["must not be empty"] } }))
        );
    }
}
