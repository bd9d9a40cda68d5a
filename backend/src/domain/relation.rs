//! Favorite, shopping-cart and subscription links.
//!
//! Each link is a binary state per `(owner, target)` pair. The transition
//! rules live in [`plan_toggle`], a pure function with no storage access, so
//! the same rules apply to every relation and are testable in isolation.
//!
//! Toggles are deliberately not idempotent: linking an already linked pair
//! or unlinking an unlinked pair is reported as a conflict.

use std::fmt;

use super::Error;

/// The relation a link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// User → recipe favorite.
    Favorite,
    /// User → recipe shopping-cart entry.
    ShoppingCart,
    /// User → author subscription.
    Subscription,
}

impl RelationKind {
    /// Every relation kind.
    pub const ALL: [Self; 3] = [Self::Favorite, Self::ShoppingCart, Self::Subscription];

    /// Stable lower-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of an `(owner, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// A join row exists.
    Linked,
    /// No join row exists.
    Unlinked,
}

impl LinkState {
    /// State derived from a row-existence check.
    #[must_use]
    pub const fn from_exists(exists: bool) -> Self {
        if exists { Self::Linked } else { Self::Unlinked }
    }
}

/// Requested toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// `POST`: create the link.
    Link,
    /// `DELETE`: remove the link.
    Unlink,
}

/// Storage effect to carry out for an accepted toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    /// Insert the join row.
    Insert,
    /// Delete the join row.
    Remove,
}

/// Rejected toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationConflict {
    /// The pair is already linked.
    AlreadyLinked(RelationKind),
    /// The pair is not linked.
    NotLinked(RelationKind),
    /// A user tried to subscribe to themselves.
    SelfSubscription,
}

impl RelationConflict {
    /// Human-readable message returned to clients.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AlreadyLinked(RelationKind::Favorite) => "recipe is already in favorites",
            Self::AlreadyLinked(RelationKind::ShoppingCart) => {
                "recipe is already in the shopping cart"
            }
            Self::AlreadyLinked(RelationKind::Subscription) => "already subscribed to this author",
            Self::NotLinked(RelationKind::Favorite) => "recipe is not in favorites",
            Self::NotLinked(RelationKind::ShoppingCart) => "recipe is not in the shopping cart",
            Self::NotLinked(RelationKind::Subscription) => "subscription does not exist",
            Self::SelfSubscription => "cannot subscribe to yourself",
        }
    }
}

impl fmt::Display for RelationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<RelationConflict> for Error {
    fn from(conflict: RelationConflict) -> Self {
        Self::relationship_conflict(conflict.message())
    }
}

/// Decide the outcome of a toggle request.
///
/// `targets_self` is only meaningful for subscriptions: subscribing to
/// yourself is rejected before the current state is considered.
///
/// # Errors
/// Returns the [`RelationConflict`] describing why the toggle is refused.
///
/// # Examples
/// ```
/// use recipes_backend::domain::{
///     LinkState, LinkTransition, RelationConflict, RelationKind, ToggleAction, plan_toggle,
/// };
///
/// assert_eq!(
///     plan_toggle(RelationKind::Favorite, LinkState::Unlinked, ToggleAction::Link, false),
///     Ok(LinkTransition::Insert)
/// );
/// assert_eq!(
///     plan_toggle(RelationKind::Favorite, LinkState::Linked, ToggleAction::Link, false),
///     Err(RelationConflict::AlreadyLinked(RelationKind::Favorite))
/// );
/// ```
pub const fn plan_toggle(
    kind: RelationKind,
    state: LinkState,
    action: ToggleAction,
    targets_self: bool,
) -> Result<LinkTransition, RelationConflict> {
    if targets_self && matches!(kind, RelationKind::Subscription) {
        if let ToggleAction::Link = action {
            return Err(RelationConflict::SelfSubscription);
        }
    }
    match (state, action) {
        (LinkState::Unlinked, ToggleAction::Link) => Ok(LinkTransition::Insert),
        (LinkState::Linked, ToggleAction::Link) => Err(RelationConflict::AlreadyLinked(kind)),
        (LinkState::Linked, ToggleAction::Unlink) => Ok(LinkTransition::Remove),
        (LinkState::Unlinked, ToggleAction::Unlink) => Err(RelationConflict::NotLinked(kind)),
    }
}
