//! Ingredients (reference data) and the name-prefix filter policy.

use serde::{Deserialize, Serialize};

use super::IngredientId;

/// Ingredient with its unit of measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Primary key.
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Unit the recipe amount is expressed in, e.g. `g`.
    pub measurement_unit: String,
}

/// Ingredient list filter.
///
/// A blank or absent `name` matches every ingredient; otherwise the
/// ingredient name must start with it, ignoring case.
///
/// # Examples
/// ```
/// use recipes_backend::domain::{Ingredient, IngredientFilter, IngredientId};
///
/// let salt = Ingredient {
///     id: IngredientId::new(1),
///     name: "Salt".into(),
///     measurement_unit: "g".into(),
/// };
/// assert!(IngredientFilter::by_name_prefix("sa").matches(&salt));
/// assert!(!IngredientFilter::by_name_prefix("alt").matches(&salt));
/// assert!(IngredientFilter::default().matches(&salt));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    name_prefix: Option<String>,
}

impl IngredientFilter {
    /// Filter by case-insensitive name prefix.
    pub fn by_name_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim();
        Self {
            name_prefix: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    /// Lower-cased prefix, if the filter narrows the list.
    #[must_use]
    pub fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref()
    }

    /// Whether `ingredient` passes the filter.
    #[must_use]
    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        self.name_prefix
            .as_deref()
            .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
    }
}
