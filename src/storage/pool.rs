//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled so the host can read while a pass writes
//! - Automatic database file creation
//! - Schema migrations applied on open

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use sqlx::{Pool, Sqlite, SqlitePool};

use super::migrations::run_migrations;
use crate::error_handling::InitializationError;

/// Opens (creating if needed) the SQLite database at `db_path` and migrates it.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Arc<Pool<Sqlite>>, InitializationError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created at {}", db_path_str),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Using existing database {}", db_path_str)
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(InitializationError::DatabaseError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            InitializationError::DatabaseError(e.to_string())
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            InitializationError::DatabaseError(e.to_string())
        })?;

    run_migrations(&pool).await.map_err(|e| {
        error!("Failed to run migrations: {e}");
        InitializationError::DatabaseError(e.to_string())
    })?;

    Ok(Arc::new(pool))
}
