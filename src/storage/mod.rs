//! Snapshot persistence (SQLite).

pub mod migrations;
pub mod pool;
mod store;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use store::SnapshotStore;
