//! Fan-engagement backend: profiles, an idempotent points ledger and the
//! features that award points into it.
//!
//! - [`domain`]: types, ports and services.
//! - [`inbound`]: HTTP handlers.
//! - [`outbound`]: PostgreSQL, in-memory and verifier adapters.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
