// Shared test helpers for database setup.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::storage::run_migrations;

/// Creates an in-memory database pool with migrations applied.
///
/// A single connection, since every new connection to `sqlite::memory:`
/// opens a fresh empty database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
