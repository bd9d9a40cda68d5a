//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`) describe what the services need from
//! storage; each exposes a typed error built with `define_port_error!` so
//! adapters map their failures into predictable variants. Driving ports
//! (`*Query`, `*Command`, [`LoginService`]) are what inbound adapters call.

mod macros;

mod catalogue_query;
mod catalogue_repository;
mod login_service;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod relation_repository;
mod relations_command;
mod subscriptions_query;
mod user_repository;

pub(crate) use macros::define_port_error;

pub use catalogue_query::CatalogueQuery;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
pub use login_service::{
    FIXTURE_PASSWORD, FIXTURE_USER_ID, FIXTURE_USERNAME, FixtureLoginService, LoginService,
};
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
pub use recipes_command::RecipesCommand;
pub use recipes_query::RecipesQuery;
pub use relation_repository::{RelationRepository, RelationRepositoryError};
pub use relations_command::{RecipeRelation, RelationsCommand};
pub use subscriptions_query::SubscriptionsQuery;
pub use user_repository::{UserPersistenceError, UserRepository};

#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
#[cfg(test)]
pub use relation_repository::MockRelationRepository;
#[cfg(test)]
pub use relations_command::MockRelationsCommand;
#[cfg(test)]
pub use subscriptions_query::MockSubscriptionsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;

#[cfg(test)]
mod tests {
    //! Checks that the port surface is reachable from `domain::ports`.

    use std::sync::Arc;

    use super::*;
    use crate::domain::{LoginCredentials, RelationKind};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_login_is_usable_as_a_driving_port() {
        let port: Arc<dyn LoginService> = Arc::new(FixtureLoginService);
        let creds = LoginCredentials::try_from_parts(FIXTURE_USERNAME, FIXTURE_PASSWORD)
            .expect("credentials");
        assert_eq!(
            port.authenticate(&creds).await.expect("fixture login"),
            FIXTURE_USER_ID
        );
    }

    #[rstest]
    fn repository_errors_are_built_through_generated_constructors() {
        assert_eq!(
            RelationRepositoryError::duplicate(),
            RelationRepositoryError::Duplicate
        );
        assert_eq!(
            UserPersistenceError::query("timeout").to_string(),
            "user repository query failed: timeout"
        );
    }

    #[rstest]
    #[case(RecipeRelation::Favorite, RelationKind::Favorite)]
    #[case(RecipeRelation::ShoppingCart, RelationKind::ShoppingCart)]
    fn recipe_relations_map_onto_relation_kinds(
        #[case] relation: RecipeRelation,
        #[case] kind: RelationKind,
    ) {
        assert_eq!(RelationKind::from(relation), kind);
    }
}
