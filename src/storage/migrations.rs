//! Schema migrations for the inventory database.

use std::path::Path;

use log::debug;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{Pool, Sqlite};

/// Applies every pending migration from the crate's `migrations/` directory.
///
/// Applied migrations are skipped, so this runs on every open.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), MigrateError> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = Migrator::new(dir.as_path()).await?;
    debug!("Checking {} inventory migration(s)", migrator.iter().count());
    migrator.run(pool).await
}
