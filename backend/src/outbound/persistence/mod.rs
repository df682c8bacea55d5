//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Adapters translate between Diesel rows and domain types and hold no
//! business rules. Row structs and the schema stay private to this module.
//!
//! ```ignore
//! use fanclub::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/fanclub")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_document_repository;
mod diesel_error_mapping;
mod diesel_points_ledger_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_points_ledger_repository::DieselPointsLedgerRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
