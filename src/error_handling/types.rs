//! Error type definitions.
//!
//! This module defines the error types used throughout the application.
//! Recoverable failures (registrant lookups, corrupt stored snapshots) never
//! show up here: they are absorbed where they happen. What remains is what a
//! caller has to act on.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Applying the bundled schema failed.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A snapshot could not be encoded for storage.
    #[error("Snapshot serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The scan input or the requested domain cannot be assessed as given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// The requested domain is not a usable hostname.
    #[error("invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// The raw scan result could not be decoded.
    #[error("malformed scan result: {0}")]
    MalformedScan(String),

    /// The scan has not reached a final status (`READY` or `ERROR`).
    #[error("scan is not final yet (status '{status}')")]
    ScanNotFinal { status: String },

    /// The scan result describes a different host than the one requested.
    #[error("scan result is for '{reported}', not '{requested}'")]
    HostMismatch { requested: String, reported: String },
}

/// Why an assessment failed.
///
/// Only two kinds of failure reach the caller of the pipeline: bad input
/// (do not retry as-is) and persistence (the store rejected the snapshot;
/// the same request may succeed later).
#[derive(Error, Debug)]
pub enum AssessmentError {
    /// Input precondition failure.
    #[error("assessment rejected: {0}")]
    Precondition(#[from] PreconditionError),

    /// The snapshot could not be persisted. Nothing was written.
    #[error("assessment could not be persisted: {0}")]
    Persistence(#[from] DatabaseError),
}

impl AssessmentError {
    /// Taxonomy kind of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            AssessmentError::Precondition(_) => FailureKind::Precondition,
            AssessmentError::Persistence(_) => FailureKind::Persistence,
        }
    }
}

/// Failure taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    /// Bad or non-final input
    Precondition,
    /// Store unreachable or write rejected
    Persistence,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Precondition => "precondition",
            FailureKind::Persistence => "persistence",
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, FailureKind::Persistence)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
