//! Recipe sharing backend.
//!
//! Hexagonal layout: `domain` holds the entities, services and ports;
//! `inbound::http` adapts Actix requests onto the driving ports;
//! `outbound` provides the Diesel and in-memory repositories; `server`
//! wires everything into an [`actix_web::HttpServer`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
