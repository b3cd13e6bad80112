// Shared test helpers for database setup and scan report fixtures.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use ssl_posture::storage::run_migrations;
use ssl_posture::{Registrant, RegistrantLookup, SnapshotStore};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Store over a fresh in-memory database.
#[allow(dead_code)]
pub async fn create_test_store() -> SnapshotStore {
    SnapshotStore::new(Arc::new(create_test_pool().await))
}

/// Store over an on-disk database at `db_path`, created if needed.
#[allow(dead_code)]
pub async fn create_test_store_with_path(db_path: &Path) -> SnapshotStore {
    ssl_posture::open_store(db_path)
        .await
        .expect("Failed to open on-disk store")
}

/// Registrant lookup that answers the same registrant for every host.
#[derive(Clone, Default)]
pub struct StaticRegistrant(pub Registrant);

impl StaticRegistrant {
    #[allow(dead_code)]
    pub fn new(country: &str, organization: &str) -> Self {
        Self(Registrant {
            country: Some(country.to_string()),
            organization: Some(organization.to_string()),
        })
    }
}

impl RegistrantLookup for StaticRegistrant {
    async fn lookup(&self, _host: &str) -> Registrant {
        self.0.clone()
    }
}

/// Builds a final SSL Labs `analyze` document for `host` with one endpoint per
/// `(address, grade)` pair. An empty grade omits the field.
#[allow(dead_code)]
pub fn scan_json(host: &str, status: &str, endpoints: &[(&str, &str)]) -> String {
    let endpoints: Vec<serde_json::Value> = endpoints
        .iter()
        .map(|(address, grade)| {
            let mut endpoint = serde_json::json!({
                "ipAddress": address,
                "statusMessage": "Ready",
                "hasWarnings": false,
                "isExceptional": false,
                "progress": 100,
                "duration": 60000,
                "delegation": 1
            });
            if !grade.is_empty() {
                endpoint["grade"] = serde_json::Value::from(*grade);
                endpoint["gradeTrustIgnored"] = serde_json::Value::from(*grade);
            }
            endpoint
        })
        .collect();

    serde_json::json!({
        "host": host,
        "port": 443,
        "protocol": "http",
        "isPublic": false,
        "status": status,
        "startTime": 1_704_067_200_000i64,
        "testTime": 1_704_067_260_000i64,
        "engineVersion": "2.3.0",
        "criteriaVersion": "2009q",
        "endpoints": endpoints
    })
    .to_string()
}
