//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; every other storage
//! failure is `internal`. The inbound adapter redacts internal messages.

use super::Error;
use super::ports::{
    CatalogueRepositoryError, RecipeRepositoryError, RelationRepositoryError,
    UserPersistenceError,
};
use super::relation::{RelationConflict, RelationKind};

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Self::internal(format!("user repository error: {message}"))
            }
        }
    }
}

impl From<CatalogueRepositoryError> for Error {
    fn from(error: CatalogueRepositoryError) -> Self {
        match error {
            CatalogueRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("catalogue unavailable: {message}"))
            }
            CatalogueRepositoryError::Query { message } => {
                Self::internal(format!("catalogue error: {message}"))
            }
        }
    }
}

impl From<RecipeRepositoryError> for Error {
    fn from(error: RecipeRepositoryError) -> Self {
        match error {
            RecipeRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("recipe repository unavailable: {message}"))
            }
            RecipeRepositoryError::Query { message } => {
                Self::internal(format!("recipe repository error: {message}"))
            }
            RecipeRepositoryError::MissingReference { .. } => {
                Self::invalid_request("recipe references unknown tags or ingredients")
            }
        }
    }
}

/// Map a relation storage failure for `kind`.
///
/// Constraint violations carry domain meaning: a duplicate pair is the
/// "already linked" conflict and a self-referencing subscription is the
/// self-subscription conflict. A missing row means the target vanished.
pub(crate) fn relation_error(kind: RelationKind, error: RelationRepositoryError) -> Error {
    match error {
        RelationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("relation repository unavailable: {message}"))
        }
        RelationRepositoryError::Query { message } => {
            Error::internal(format!("relation repository error: {message}"))
        }
        RelationRepositoryError::Duplicate => RelationConflict::AlreadyLinked(kind).into(),
        RelationRepositoryError::SelfReference => RelationConflict::SelfSubscription.into(),
        RelationRepositoryError::MissingReference { .. } => match kind {
            RelationKind::Subscription => Error::not_found("user not found"),
            RelationKind::Favorite | RelationKind::ShoppingCart => {
                Error::not_found("recipe not found")
            }
        },
    }
}
