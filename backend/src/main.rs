//! Backend entry-point: loads settings, prepares persistence and serves the API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipes_backend::inbound::http::health::HealthState;
use recipes_backend::inbound::http::session_config::{BuildMode, session_settings};
use recipes_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use recipes_backend::server::{ServerConfig, ServerSettings, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| startup_error("failed to load settings", err))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(|err| startup_error("invalid session configuration", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid settings", err))?;
    let page_sizes = settings
        .page_sizes()
        .map_err(|err| startup_error("invalid settings", err))?;

    let mut config = ServerConfig::new(session, bind_addr, page_sizes);
    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(|err| startup_error("migrations failed", err))?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| startup_error("database pool failed", err))?;
            config = config.with_db_pool(pool);
        }
        None => info!("no database_url configured; using the in-memory store"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
