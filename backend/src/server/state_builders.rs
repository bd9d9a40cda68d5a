//! Builders for the HTTP state from the configured repositories.

use std::sync::Arc;

use actix_web::web;
use pagination::PageSizePolicy;

use crate::inbound::http::state::{HttpState, HttpStatePorts, Repositories};
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselRecipeRepository, DieselRelationRepository,
    DieselUserRepository,
};

use super::ServerConfig;

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        relations: Arc::new(DieselRelationRepository::new(pool.clone())),
    }
    .into_ports()
}

fn memory_ports(store: Arc<MemoryStore>) -> HttpStatePorts {
    Repositories {
        users: Arc::clone(&store),
        catalogue: Arc::clone(&store),
        recipes: Arc::clone(&store),
        relations: store,
    }
    .into_ports()
}

fn build_ports(db_pool: Option<&DbPool>) -> HttpStatePorts {
    match db_pool {
        Some(pool) => diesel_ports(pool),
        None => memory_ports(Arc::new(MemoryStore::with_defaults())),
    }
}

fn state_from(ports: HttpStatePorts, page_sizes: PageSizePolicy) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports, page_sizes))
}

/// Build the shared HTTP state: Diesel repositories when a pool is
/// configured, otherwise a seeded in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    state_from(build_ports(config.db_pool.as_ref()), config.page_sizes)
}
