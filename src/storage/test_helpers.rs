//! Shared test helpers for storage module tests.

use sqlx::SqlitePool;

use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Inserts a raw row, bypassing `SnapshotStore::append`.
/// Used to plant malformed snapshot documents.
pub async fn insert_raw_snapshot(
    pool: &SqlitePool,
    domain: &str,
    ssl_grade: &str,
    snapshot_json: &str,
) {
    sqlx::query(
        "INSERT INTO snapshots (domain, ssl_grade, server_count, created_at_ms, snapshot_json)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(domain)
    .bind(ssl_grade)
    .bind(0i64)
    .bind(1704067200000i64)
    .bind(snapshot_json)
    .execute(pool)
    .await
    .expect("Failed to insert raw snapshot");
}
