//! Integer primary-key newtypes for the recipe domain.
//!
//! Each entity gets its own identifier type so a recipe id can never be
//! passed where an author id is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw primary key.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Raw primary key value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| InvalidId {
                        kind: $label,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

/// Raised when a textual identifier is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be an integer, got `{value}`")]
pub struct InvalidId {
    /// Entity the identifier belongs to.
    pub kind: &'static str,
    /// Raw value supplied by the caller.
    pub value: String,
}

entity_id!(
    /// Identifier of a registered user (recipe author or subscriber).
    UserId,
    "user"
);
entity_id!(
    /// Identifier of a recipe.
    RecipeId,
    "recipe"
);
entity_id!(
    /// Identifier of a tag.
    TagId,
    "tag"
);
entity_id!(
    /// Identifier of an ingredient.
    IngredientId,
    "ingredient"
);
