//! Driven port for favorite, shopping-cart and subscription rows.
//!
//! All three relations share one shape: a unique `(owner, target)` pair,
//! where the target is a recipe id or, for subscriptions, an author's user id.
use async_trait::async_trait;

use crate::domain::{Paged, RelationKind, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by relation repository adapters.
    pub enum RelationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "relation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "relation repository query failed: {message}",
        /// The pair already exists.
        Duplicate => "relation already exists",
        /// A subscription row would point at its own owner.
        SelfReference => "relation owner and target are the same user",
        /// The owner or target row does not exist.
        MissingReference { message: String } => "relation references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Whether the pair is linked.
    async fn exists(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<bool, RelationRepositoryError>;

    /// Insert the pair. Fails with `Duplicate` when it already exists, which
    /// is how concurrent inserts of the same pair are resolved.
    async fn create(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<(), RelationRepositoryError>;

    /// Remove the pair. Returns whether a row was deleted.
    async fn delete(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<bool, RelationRepositoryError>;

    /// The subset of `targets` linked to `owner`.
    async fn linked_targets(
        &self,
        kind: RelationKind,
        owner: UserId,
        targets: &[i64],
    ) -> Result<Vec<i64>, RelationRepositoryError>;

    /// Targets linked to `owner`, ascending, with the total count.
    async fn list_targets(
        &self,
        kind: RelationKind,
        owner: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Paged<i64>, RelationRepositoryError>;
}
