//! Schema setup.
//!
//! The schema lives in the crate's `migrations/` directory and is applied on
//! every pool initialization; already applied versions are skipped.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Applies the bundled migrations to `pool`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DatabaseError> {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = Migrator::new(dir.as_path()).await?;
    migrator.run(pool).await?;
    log::debug!("Schema is up to date ({} migration(s))", migrator.iter().count());
    Ok(())
}
