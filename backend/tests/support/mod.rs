//! Helpers shared by the embedded PostgreSQL integration suites.
//!
//! Each suite compiles as its own crate, so not every helper is used
//! everywhere.
#![allow(dead_code, reason = "each test crate uses a different subset")]

mod cluster_skip;
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;

use fanclub::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

const ADMIN_DATABASE: &str = "postgres";

/// Flatten a `postgres` error into something readable in CI output.
///
/// The plain `Display` output is just `db error`; the SQLSTATE and server
/// message live on the inner database error.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Drop and recreate `name` so every suite starts from an empty database.
///
/// Runs through `postgres` rather than Diesel: `DROP DATABASE` cannot run
/// inside a transaction block.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url(ADMIN_DATABASE);
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Apply the service's embedded migrations to `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    run_pending_migrations(url).map_err(|err| err.to_string())
}

/// Insert a fan row with default profile values and return its id.
pub fn seed_fan(url: &str, name: &str, email: &str) -> Result<Uuid, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let id = Uuid::new_v4();
    client
        .execute(
            "INSERT INTO users (id, name, email) VALUES ($1, $2, $3)",
            &[&id, &name, &email],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(id)
}

/// Read the denormalised `users.points` total.
pub fn stored_points_total(url: &str, id: Uuid) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one("SELECT points FROM users WHERE id = $1", &[&id])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}
