// storage/mod.rs
// SQLite inventory: pool setup, migrations and the Inventory implementation

mod inventory;
pub mod migrations;
pub mod pool;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use inventory::SqliteInventory;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
