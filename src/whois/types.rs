//! Registrant data structures.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Ownership metadata of a domain.
///
/// Both fields are `None` when the lookup failed or the registry redacts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    /// Registrant country, as published by the registry (usually ISO 3166-1 alpha-2)
    pub country: Option<String>,
    /// Registrant organization
    pub organization: Option<String>,
}

impl Registrant {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.organization.is_none()
    }
}

/// A registrant cached on disk, with the time it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WhoisCacheEntry {
    pub(crate) registrant: Registrant,
    pub(crate) cached_at: SystemTime,
    pub(crate) domain: String,
}
