//! Registrant lookup.
//!
//! The pipeline enriches every scanned endpoint with the registrant of the
//! domain under assessment. Lookups never fail from the caller's point of
//! view: any error degrades to an empty `Registrant` and is logged.
//!
//! `WhoisLookup` uses the `whois-service` crate, which tries RDAP first and
//! falls back to WHOIS, and caches results on disk.

mod cache;
mod parse;
mod types;

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Result;
use whois_service::WhoisClient;

use crate::config::WHOIS_CACHE_TTL_SECS;

pub use types::Registrant;

/// Resolves registrant metadata for a host.
///
/// Implementations must absorb their own failures and return an empty
/// `Registrant` instead. No retries.
pub trait RegistrantLookup: Send + Sync {
    fn lookup(&self, host: &str) -> impl Future<Output = Registrant> + Send;
}

/// WHOIS/RDAP registrant lookup with an on-disk cache.
#[derive(Debug, Clone)]
pub struct WhoisLookup {
    enabled: bool,
    cache_dir: PathBuf,
}

impl WhoisLookup {
    /// Creates a lookup caching results under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            cache_dir: cache_dir.into(),
        }
    }

    /// A lookup that never queries WHOIS and always returns an empty registrant.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            cache_dir: PathBuf::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache-then-query lookup that degrades every failure to an empty
    /// registrant. `query` performs the remote lookup on a cache miss.
    async fn lookup_with<F, Fut>(&self, domain: &str, query: F) -> Registrant
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Registrant>>,
    {
        if !self.enabled {
            return Registrant::default();
        }
        match self.lookup_cached(domain, query).await {
            Ok(registrant) => registrant,
            Err(e) => {
                log::warn!("WHOIS lookup failed for {}: {:#}", domain, e);
                Registrant::default()
            }
        }
    }

    async fn lookup_cached<F, Fut>(&self, domain: &str, query: F) -> Result<Registrant>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Registrant>>,
    {
        match cache::load_from_cache(&self.cache_dir, domain, WHOIS_CACHE_TTL_SECS) {
            Ok(Some(cached)) => {
                log::debug!("WHOIS cache hit for {}", domain);
                return Ok(cached.registrant);
            }
            Ok(None) => {}
            Err(e) => log::debug!("Ignoring unreadable WHOIS cache for {}: {:#}", domain, e),
        }

        log::info!("Starting WHOIS lookup for domain: {}", domain);
        let registrant = query(domain.to_string()).await?;
        log::info!(
            "WHOIS lookup successful for {} (country: {}, organization: {})",
            domain,
            registrant.country.as_deref().unwrap_or("-"),
            registrant.organization.as_deref().unwrap_or("-")
        );

        if let Err(e) = cache::save_to_cache(&self.cache_dir, domain, &registrant) {
            log::warn!("Failed to cache WHOIS result for {}: {:#}", domain, e);
        }

        Ok(registrant)
    }
}

/// RDAP/WHOIS query through `whois-service`.
async fn query_whois(domain: String) -> Result<Registrant> {
    let client = WhoisClient::new()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create WHOIS client: {}", e))?;
    let response = client
        .lookup(&domain)
        .await
        .map_err(|e| anyhow::anyhow!("WHOIS query failed: {}", e))?;
    Ok(parse::registrant_from_response(&response))
}

impl RegistrantLookup for WhoisLookup {
    async fn lookup(&self, host: &str) -> Registrant {
        self.lookup_with(host, query_whois).await
    }
}
