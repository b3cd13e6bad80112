//! ssl_posture library: TLS posture assessment with change history
//!
//! Combines an SSL Labs scan of a domain with registrant (WHOIS) metadata,
//! reduces the per-endpoint grades to one aggregate grade, detects whether the
//! server fleet changed since the previous check and records every check in an
//! append-only SQLite history.
//!
//! # Example
//!
//! ```no_run
//! use ssl_posture::{open_store, Assessor, PageMetadata, WhoisLookup};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = open_store(Path::new("./ssl_posture.db")).await?;
//! let assessor = Assessor::new(store, WhoisLookup::new(".whois_cache"));
//!
//! let raw_scan = std::fs::read_to_string("example.com.json")?;
//! let snapshot = assessor
//!     .assess("example.com", &raw_scan, PageMetadata::default())
//!     .await?;
//! println!(
//!     "{}: {} (was {}), servers changed: {}",
//!     snapshot.domain, snapshot.ssl_grade, snapshot.previous_ssl_grade, snapshot.servers_changed
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod change;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod grade;
pub mod initialization;
pub mod models;
pub mod page;
pub mod pipeline;
pub mod scan;
pub mod server;
pub mod storage;
mod utils;
pub mod whois;

use std::path::Path;
use std::sync::Arc;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{AssessmentError, DatabaseError, FailureKind, PreconditionError};
pub use grade::LetterGrade;
pub use models::{DomainSnapshot, HistoryIndex, PreviousGrade, ServerRecord};
pub use pipeline::{Assessor, PageMetadata};
pub use storage::SnapshotStore;
pub use whois::{Registrant, RegistrantLookup, WhoisLookup};

/// Opens (creating if needed) the SQLite history at `path` and applies the
/// bundled schema.
///
/// # Errors
///
/// Returns a `DatabaseError` if the file cannot be created or opened, or if
/// the schema cannot be applied.
pub async fn open_store(path: &Path) -> Result<SnapshotStore, DatabaseError> {
    let pool = storage::init_db_pool_with_path(path).await?;
    Ok(SnapshotStore::new(Arc::clone(&pool)))
}

/// Registrant lookup selected by `config.enable_whois`.
pub fn whois_lookup(config: &Config) -> WhoisLookup {
    if config.enable_whois {
        WhoisLookup::new(config.whois_cache_dir.clone())
    } else {
        WhoisLookup::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_store_creates_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.db");

        let store = open_store(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.list_domains().await.unwrap().is_empty());
    }

    #[test]
    fn test_whois_lookup_follows_config() {
        let config = Config {
            enable_whois: false,
            ..Default::default()
        };
        assert!(!whois_lookup(&config).is_enabled());
        assert!(whois_lookup(&Config::default()).is_enabled());
    }
}
