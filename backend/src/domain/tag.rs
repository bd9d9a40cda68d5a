//! Recipe tags (reference data).

use serde::{Deserialize, Serialize};

use super::TagId;

/// Label attached to recipes, selectable by slug in recipe filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Primary key.
    pub id: TagId,
    /// Display name.
    pub name: String,
    /// Hex colour such as `#E26C2D`.
    pub color: String,
    /// URL-safe unique key used by the `tags` filter.
    pub slug: String,
}
