//! Error handling.
//!
//! This module provides the error types for initialization, persistence and
//! assessment failures, and the failure taxonomy exposed to callers:
//! - **Precondition**: the scan input or domain cannot be assessed as given
//! - **Persistence**: the snapshot store rejected or could not take the write

mod types;

// Re-export public API
pub use types::{
    AssessmentError, DatabaseError, FailureKind, InitializationError, PreconditionError,
};
