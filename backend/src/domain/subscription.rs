//! Author subscription read model.

use super::{RecipeSummary, User};

/// An author as seen by one of their subscribers.
///
/// `recipes` may be truncated by the caller's `recipes_limit`;
/// `recipes_count` always counts every recipe by the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSubscription {
    /// The followed author.
    pub author: User,
    /// The author's recipes, newest first.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author.
    pub recipes_count: u64,
}
