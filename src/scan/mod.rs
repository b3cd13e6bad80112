//! SSL Labs scan input.
//!
//! - `types`: the `analyze` report structures consumed by the pipeline
//! - `client`: fetches and polls reports from the SSL Labs API

mod client;
mod types;

pub use client::{ScanClient, ScanClientError};
pub use types::{ScanEndpoint, ScanReport, ScanStatus};
