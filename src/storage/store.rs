//! Append-only snapshot store.
//!
//! Every assessment becomes one row of the `snapshots` table. Rows are never
//! updated or deleted; "latest" means highest `id` for the domain. The
//! `snapshot_json` column holds the full `DomainSnapshot` and is the source of
//! truth for the server list. `ssl_grade` and `domain` are duplicated in
//! their own columns for the grade and history queries.
//!
//! All statements bind their parameters.

use std::sync::Arc;

use log::{error, warn};
use serde::Deserialize;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::{DomainSnapshot, PreviousGrade, ServerRecord};

/// The part of a stored document the change baseline depends on.
#[derive(Deserialize)]
struct StoredServers {
    servers: Vec<ServerRecord>,
}

/// Decodes the server list of a stored document, empty if unreadable.
fn decode_servers(id: i64, domain: &str, json: &str) -> Vec<ServerRecord> {
    match serde_json::from_str::<StoredServers>(json) {
        Ok(stored) => stored.servers,
        Err(e) => {
            warn!(
                "Snapshot {} for {} is malformed, treating as no prior data: {}",
                id, domain, e
            );
            Vec::new()
        }
    }
}

/// Snapshot history backed by SQLite.
#[derive(Clone)]
pub struct SnapshotStore {
    pool: Arc<SqlitePool>,
}

impl SnapshotStore {
    /// Wraps a pool whose database already has the `snapshots` schema.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Appends one snapshot and returns its row id.
    ///
    /// The snapshot is encoded before the statement runs and written by a
    /// single `INSERT`, so a failure leaves nothing behind.
    pub async fn append(&self, snapshot: &DomainSnapshot) -> Result<i64, DatabaseError> {
        let document = serde_json::to_string(snapshot)?;

        let result = sqlx::query(
            "INSERT INTO snapshots (domain, ssl_grade, server_count, created_at_ms, snapshot_json)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&snapshot.domain)
        .bind(&snapshot.ssl_grade)
        .bind(snapshot.servers.len() as i64)
        .bind(snapshot.created_at.timestamp_millis())
        .bind(document)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to append snapshot for {}: {}", snapshot.domain, e);
            DatabaseError::SqlError(e)
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Aggregate grade of the most recent snapshot, or `PreviousGrade::Unknown`.
    pub async fn latest_grade(&self, domain: &str) -> Result<PreviousGrade, DatabaseError> {
        let grade: Option<String> = sqlx::query_scalar(
            "SELECT ssl_grade FROM snapshots WHERE domain = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(domain)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(grade.map_or(PreviousGrade::Unknown, PreviousGrade::Known))
    }

    /// Server list of the most recent snapshot.
    ///
    /// Empty when the domain has no history or when the latest stored
    /// document has no readable `servers` array.
    pub async fn latest_servers(&self, domain: &str) -> Result<Vec<ServerRecord>, DatabaseError> {
        let document: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, snapshot_json FROM snapshots WHERE domain = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(domain)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(document
            .map(|(id, json)| decode_servers(id, domain, &json))
            .unwrap_or_default())
    }

    /// Grade and server list of the most recent snapshot, read from one row.
    ///
    /// Equivalent to `latest_grade` plus `latest_servers`, but a concurrent
    /// append cannot land between the two reads.
    pub async fn latest_baseline(
        &self,
        domain: &str,
    ) -> Result<(PreviousGrade, Vec<ServerRecord>), DatabaseError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT id, ssl_grade, snapshot_json FROM snapshots
             WHERE domain = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(domain)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(match row {
            Some((id, grade, json)) => (
                PreviousGrade::Known(grade),
                decode_servers(id, domain, &json),
            ),
            None => (PreviousGrade::Unknown, Vec::new()),
        })
    }

    /// Distinct domains with at least one snapshot, in order of first assessment.
    pub async fn list_domains(&self) -> Result<Vec<String>, DatabaseError> {
        let domains: Vec<String> = sqlx::query_scalar(
            "SELECT domain FROM snapshots GROUP BY domain ORDER BY MIN(id)",
        )
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(domains)
    }

    /// Every decodable snapshot of `domain`, oldest first.
    ///
    /// Malformed documents are skipped with a warning.
    pub async fn domain_history(&self, domain: &str) -> Result<Vec<DomainSnapshot>, DatabaseError> {
        let rows = sqlx::query("SELECT id, snapshot_json FROM snapshots WHERE domain = ? ORDER BY id")
            .bind(domain)
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut snapshots = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.get("id");
            let json: String = row.get("snapshot_json");
            match serde_json::from_str::<DomainSnapshot>(&json) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => warn!("Skipping malformed snapshot {} for {}: {}", id, domain, e),
            }
        }
        Ok(snapshots)
    }

    /// Number of stored snapshots for `domain`, malformed ones included.
    pub async fn snapshot_count(&self, domain: &str) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snapshots WHERE domain = ?")
            .bind(domain)
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_GRADE;
    use crate::storage::test_helpers::{create_test_pool, insert_raw_snapshot};
    use chrono::{DateTime, Utc};

    async fn test_store() -> SnapshotStore {
        SnapshotStore::new(Arc::new(create_test_pool().await))
    }

    fn server(address: &str, grade: &str) -> ServerRecord {
        ServerRecord {
            address: address.to_string(),
            ssl_grade: grade.to_string(),
            country: String::new(),
            owner: String::new(),
        }
    }

    fn snapshot(domain: &str, grade: &str, servers: Vec<ServerRecord>) -> DomainSnapshot {
        DomainSnapshot {
            domain: domain.to_string(),
            servers,
            servers_changed: true,
            ssl_grade: grade.to_string(),
            previous_ssl_grade: UNKNOWN_GRADE.to_string(),
            logo: String::new(),
            title: String::new(),
            is_down: false,
            created_at: DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = test_store().await;
        assert_eq!(
            store.latest_grade("example.com").await.unwrap(),
            PreviousGrade::Unknown
        );
        assert!(store.latest_servers("example.com").await.unwrap().is_empty());
        assert!(store.list_domains().await.unwrap().is_empty());
        assert!(store.domain_history("example.com").await.unwrap().is_empty());
        assert_eq!(store.snapshot_count("example.com").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_then_latest() {
        let store = test_store().await;
        let servers = vec![server("1.2.3.4", "B"), server("1.2.3.5", "F")];
        store
            .append(&snapshot("example.com", "F", servers.clone()))
            .await
            .unwrap();

        assert_eq!(
            store.latest_grade("example.com").await.unwrap(),
            PreviousGrade::Known("F".to_string())
        );
        assert_eq!(store.latest_servers("example.com").await.unwrap(), servers);
    }

    #[tokio::test]
    async fn test_latest_is_most_recent_append() {
        let store = test_store().await;
        store
            .append(&snapshot("example.com", "A", vec![server("1.2.3.4", "A")]))
            .await
            .unwrap();
        store
            .append(&snapshot("example.com", "C", vec![server("1.2.3.9", "C")]))
            .await
            .unwrap();

        assert_eq!(
            store.latest_grade("example.com").await.unwrap(),
            PreviousGrade::Known("C".to_string())
        );
        assert_eq!(
            store.latest_servers("example.com").await.unwrap(),
            vec![server("1.2.3.9", "C")]
        );
    }

    #[tokio::test]
    async fn test_domains_are_isolated() {
        let store = test_store().await;
        store
            .append(&snapshot("example.com", "A", vec![server("1.2.3.4", "A")]))
            .await
            .unwrap();

        assert_eq!(
            store.latest_grade("example.org").await.unwrap(),
            PreviousGrade::Unknown
        );
        assert!(store.latest_servers("example.org").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_ids_increase() {
        let store = test_store().await;
        let first = store.append(&snapshot("a.com", "A", vec![])).await.unwrap();
        let second = store.append(&snapshot("a.com", "A", vec![])).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_domains_distinct_in_first_seen_order() {
        let store = test_store().await;
        for domain in ["b.com", "a.com", "b.com", "c.com", "a.com"] {
            store.append(&snapshot(domain, "A", vec![])).await.unwrap();
        }
        assert_eq!(
            store.list_domains().await.unwrap(),
            vec!["b.com".to_string(), "a.com".to_string(), "c.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_domain_history_in_insertion_order() {
        let store = test_store().await;
        for grade in ["A", "B", "C"] {
            store
                .append(&snapshot("example.com", grade, vec![]))
                .await
                .unwrap();
        }
        let grades: Vec<String> = store
            .domain_history("example.com")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.ssl_grade)
            .collect();
        assert_eq!(grades, vec!["A", "B", "C"]);
        assert_eq!(store.snapshot_count("example.com").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_malformed_latest_document_reads_as_empty() {
        let store = test_store().await;
        store
            .append(&snapshot("example.com", "A", vec![server("1.2.3.4", "A")]))
            .await
            .unwrap();
        insert_raw_snapshot(store.pool(), "example.com", "B", "{\"servers\": [truncated").await;

        assert!(store.latest_servers("example.com").await.unwrap().is_empty());
        // The grade column is still readable
        assert_eq!(
            store.latest_grade("example.com").await.unwrap(),
            PreviousGrade::Known("B".to_string())
        );
    }

    #[tokio::test]
    async fn test_latest_servers_only_needs_servers_field() {
        let store = test_store().await;
        insert_raw_snapshot(
            store.pool(),
            "example.com",
            "A",
            r#"{"servers":[{"address":"1.2.3.4","ssl_grade":"A","country":"","owner":""}],"renamed_field":1}"#,
        )
        .await;

        assert_eq!(
            store.latest_servers("example.com").await.unwrap(),
            vec![server("1.2.3.4", "A")]
        );
    }

    #[tokio::test]
    async fn test_latest_baseline_reads_one_row() {
        let store = test_store().await;
        assert_eq!(
            store.latest_baseline("example.com").await.unwrap(),
            (PreviousGrade::Unknown, Vec::new())
        );

        store
            .append(&snapshot("example.com", "A", vec![server("1.2.3.4", "A")]))
            .await
            .unwrap();
        store
            .append(&snapshot("example.com", "C", vec![server("1.2.3.9", "C")]))
            .await
            .unwrap();
        assert_eq!(
            store.latest_baseline("example.com").await.unwrap(),
            (
                PreviousGrade::Known("C".to_string()),
                vec![server("1.2.3.9", "C")]
            )
        );

        insert_raw_snapshot(store.pool(), "example.com", "D", "{garbage").await;
        assert_eq!(
            store.latest_baseline("example.com").await.unwrap(),
            (PreviousGrade::Known("D".to_string()), Vec::new())
        );
    }

    #[tokio::test]
    async fn test_domain_history_skips_malformed_rows() {
        let store = test_store().await;
        store
            .append(&snapshot("example.com", "A", vec![]))
            .await
            .unwrap();
        insert_raw_snapshot(store.pool(), "example.com", "B", "not json").await;

        assert_eq!(store.domain_history("example.com").await.unwrap().len(), 1);
        assert_eq!(store.snapshot_count("example.com").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_domain_is_bound_not_interpolated() {
        let store = test_store().await;
        store
            .append(&snapshot("example.com", "A", vec![]))
            .await
            .unwrap();

        let hostile = "x' OR '1'='1";
        assert_eq!(
            store.latest_grade(hostile).await.unwrap(),
            PreviousGrade::Unknown
        );
        store.append(&snapshot(hostile, "F", vec![])).await.unwrap();
        assert_eq!(store.list_domains().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_append_fails_on_closed_pool() {
        let store = test_store().await;
        store.pool().close().await;
        let result = store.append(&snapshot("example.com", "A", vec![])).await;
        assert!(matches!(result, Err(DatabaseError::SqlError(_))));
    }
}
