//! SSL Labs scan report structures.
//!
//! Mirrors the subset of the SSL Labs v3 `analyze` response the pipeline reads.
//! Every field defaults when absent: in-progress reports routinely omit
//! endpoint grades and timing fields.

use serde::{Deserialize, Serialize};

/// Host-level scan report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanReport {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub is_public: bool,
    pub status: String,
    pub status_message: String,
    pub start_time: i64,
    pub test_time: i64,
    pub engine_version: String,
    pub criteria_version: String,
    pub endpoints: Vec<ScanEndpoint>,
}

/// One endpoint (server IP) of a scan report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanEndpoint {
    pub ip_address: String,
    pub server_name: String,
    pub status_message: String,
    pub grade: String,
    pub grade_trust_ignored: String,
    pub has_warnings: bool,
    pub is_exceptional: bool,
    pub progress: i64,
    pub duration: i64,
    pub delegation: i64,
}

/// Lifecycle state of a scan report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// Assessment complete.
    Ready,
    /// Assessment failed; the host is treated as down.
    Error,
    /// `DNS`, `IN_PROGRESS` or anything not final.
    Pending(String),
}

impl ScanStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "READY" => ScanStatus::Ready,
            "ERROR" => ScanStatus::Error,
            other => ScanStatus::Pending(other.to_string()),
        }
    }

    /// Whether the report will not change anymore.
    pub fn is_final(&self) -> bool {
        !matches!(self, ScanStatus::Pending(_))
    }
}

impl ScanReport {
    pub fn scan_status(&self) -> ScanStatus {
        ScanStatus::parse(&self.status)
    }
}
