//! Outbound adapters implementing the driven repository ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel with a `bb8` pool.
//! - **memory**: a mutex-guarded store implementing the same ports, used
//!   when no database is configured and by tests.

pub mod memory;
pub mod persistence;
