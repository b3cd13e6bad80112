//! Assessment data model.
//!
//! `ServerRecord` and `DomainSnapshot` are both the pipeline output and the
//! persisted document: a snapshot is stored as its JSON serialization, and the
//! stored form is what later runs diff against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grade::LetterGrade;

/// Value reported as the previous grade when a domain has no history.
pub const UNKNOWN_GRADE: &str = "unknown";

/// One scanned endpoint of a domain, enriched with registrant data.
///
/// `country` and `owner` are empty when the registrant lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Endpoint IP address as reported by the scan
    pub address: String,
    /// Endpoint grade, verbatim (may be `T`, `M` or empty)
    pub ssl_grade: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub owner: String,
}

/// One immutable, timestamped assessment of a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSnapshot {
    pub domain: String,
    pub servers: Vec<ServerRecord>,
    /// Whether `servers` differs from the previous snapshot's list
    pub servers_changed: bool,
    /// Aggregate grade; empty when no endpoint carried a recognized grade.
    pub ssl_grade: String,
    /// Aggregate grade of the prior snapshot, or [`UNKNOWN_GRADE`].
    pub previous_ssl_grade: String,
    pub logo: String,
    pub title: String,
    /// The scan finished with status `ERROR`
    pub is_down: bool,
    pub created_at: DateTime<Utc>,
}

impl DomainSnapshot {
    /// The aggregate grade, if it is one of the recognized classes.
    pub fn aggregate_grade(&self) -> Option<LetterGrade> {
        self.ssl_grade.parse().ok()
    }
}

/// Aggregate grade of the most recent stored snapshot for a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousGrade {
    /// The latest snapshot's aggregate grade (possibly empty).
    Known(String),
    /// The domain has never been assessed.
    Unknown,
}

impl PreviousGrade {
    pub fn as_str(&self) -> &str {
        match self {
            PreviousGrade::Known(grade) => grade,
            PreviousGrade::Unknown => UNKNOWN_GRADE,
        }
    }
}

impl std::fmt::Display for PreviousGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct domains that have at least one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryIndex {
    pub items: Vec<String>,
}
