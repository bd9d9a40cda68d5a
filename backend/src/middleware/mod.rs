//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! request tracing.

pub mod trace;

pub use trace::Trace;
