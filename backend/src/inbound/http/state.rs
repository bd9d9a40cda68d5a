//! Shared HTTP adapter state.
//!
//! Handlers receive this state through `actix_web::web::Data`, so they only
//! depend on domain ports and stay testable without I/O.

use std::sync::Arc;

use pagination::PageSizePolicy;

use crate::domain::ports::{
    CatalogueQuery, CatalogueRepository, LoginService, RecipeRepository, RecipesCommand,
    RecipesQuery, RelationRepository, RelationsCommand, SubscriptionsQuery, UserRepository,
};
use crate::domain::{CatalogueService, RecipeService, RelationService, UserLoginService};

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesQuery>,
    pub recipe_commands: Arc<dyn RecipesCommand>,
    pub relations: Arc<dyn RelationsCommand>,
    pub subscriptions: Arc<dyn SubscriptionsQuery>,
}

/// Driven ports the domain services are assembled from.
pub struct Repositories<U, C, R, L> {
    pub users: Arc<U>,
    pub catalogue: Arc<C>,
    pub recipes: Arc<R>,
    pub relations: Arc<L>,
}

impl<U, C, R, L> Repositories<U, C, R, L>
where
    U: UserRepository + 'static,
    C: CatalogueRepository + 'static,
    R: RecipeRepository + 'static,
    L: RelationRepository + 'static,
{
    /// Wire the domain services on top of the repositories.
    #[must_use]
    pub fn into_ports(self) -> HttpStatePorts {
        let recipe_service = Arc::new(RecipeService::new(
            Arc::clone(&self.recipes),
            Arc::clone(&self.catalogue),
            Arc::clone(&self.relations),
        ));
        let relation_service = Arc::new(RelationService::new(
            self.relations,
            self.recipes,
            Arc::clone(&self.users),
        ));
        HttpStatePorts {
            login: Arc::new(UserLoginService::new(self.users)),
            catalogue: Arc::new(CatalogueService::new(self.catalogue)),
            recipes: recipe_service.clone(),
            recipe_commands: recipe_service,
            relations: relation_service.clone(),
            subscriptions: relation_service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesQuery>,
    pub recipe_commands: Arc<dyn RecipesCommand>,
    pub relations: Arc<dyn RelationsCommand>,
    pub subscriptions: Arc<dyn SubscriptionsQuery>,
    /// Page size rules for paginated listings.
    pub page_sizes: PageSizePolicy,
}

impl HttpState {
    /// Construct state from a ports bundle and the page size policy.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use pagination::PageSizePolicy;
    /// use recipes_backend::inbound::http::state::{HttpState, Repositories};
    /// use recipes_backend::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::with_defaults());
    /// let ports = Repositories {
    ///     users: store.clone(),
    ///     catalogue: store.clone(),
    ///     recipes: store.clone(),
    ///     relations: store,
    /// }
    /// .into_ports();
    /// let state = HttpState::new(ports, PageSizePolicy::default());
    /// assert_eq!(state.page_sizes.default_size(), 6);
    /// ```
    #[must_use]
    pub fn new(ports: HttpStatePorts, page_sizes: PageSizePolicy) -> Self {
        let HttpStatePorts {
            login,
            catalogue,
            recipes,
            recipe_commands,
            relations,
            subscriptions,
        } = ports;
        Self {
            login,
            catalogue,
            recipes,
            recipe_commands,
            relations,
            subscriptions,
            page_sizes,
        }
    }
}
