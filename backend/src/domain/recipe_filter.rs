//! Recipe list filter policy.
//!
//! The HTTP adapter parses query parameters into a [`RecipeFilter`]; the
//! recipe service resolves it against the requesting user into the
//! [`RecipeCriteria`] handed to the repository.

use super::UserId;

/// Parse a boolean filter flag.
///
/// Accepts `1`/`true` and `0`/`false`, ignoring ASCII case and surrounding
/// whitespace.
///
/// # Examples
/// ```
/// use recipes_backend::domain::parse_filter_flag;
///
/// assert_eq!(parse_filter_flag("1"), Some(true));
/// assert_eq!(parse_filter_flag("False"), Some(false));
/// assert_eq!(parse_filter_flag("yes"), None);
/// ```
#[must_use]
pub fn parse_filter_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Client supplied recipe filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    /// Restrict to recipes by this author.
    pub author: Option<UserId>,
    /// `Some(true)` restricts to the requester's favorites.
    pub is_favorited: Option<bool>,
    /// `Some(true)` restricts to the requester's shopping cart.
    pub is_in_shopping_cart: Option<bool>,
}

/// Repository-level recipe selection.
///
/// Every present field narrows the result; the fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeCriteria {
    /// Any-of tag slugs. Empty means no tag restriction.
    pub tag_slugs: Vec<String>,
    /// Author restriction.
    pub author: Option<UserId>,
    /// Only recipes favorited by this user.
    pub favorited_by: Option<UserId>,
    /// Only recipes in this user's shopping cart.
    pub in_cart_of: Option<UserId>,
}

impl RecipeFilter {
    /// Resolve the filter for `viewer`.
    ///
    /// Returns `None` when the result is necessarily empty: an anonymous
    /// requester asking for favorites or shopping-cart recipes. A flag set to
    /// `false` does not narrow the list.
    #[must_use]
    pub fn resolve(self, viewer: Option<UserId>) -> Option<RecipeCriteria> {
        let favorited_by = narrow_to_viewer(self.is_favorited, viewer)?;
        let in_cart_of = narrow_to_viewer(self.is_in_shopping_cart, viewer)?;
        let mut tag_slugs: Vec<String> = self
            .tags
            .into_iter()
            .map(|slug| slug.trim().to_owned())
            .filter(|slug| !slug.is_empty())
            .collect();
        tag_slugs.sort();
        tag_slugs.dedup();
        Some(RecipeCriteria {
            tag_slugs,
            author: self.author,
            favorited_by,
            in_cart_of,
        })
    }
}

/// `Some(None)` means no narrowing, `None` means the result is empty.
fn narrow_to_viewer(flag: Option<bool>, viewer: Option<UserId>) -> Option<Option<UserId>> {
    match (flag, viewer) {
        (Some(true), Some(user)) => Some(Some(user)),
        (Some(true), None) => None,
        _ => Some(None),
    }
}
