//! WHOIS cache management.
//!
//! One JSON file per domain under the cache directory. Entries older than the
//! TTL are deleted on read.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::types::{Registrant, WhoisCacheEntry};

fn cache_file(cache_path: &Path, domain: &str) -> PathBuf {
    cache_path.join(format!("{}.json", domain.replace('.', "_")))
}

/// Loads a cached registrant from disk, if present and younger than `ttl_secs`.
pub(crate) fn load_from_cache(
    cache_path: &Path,
    domain: &str,
    ttl_secs: u64,
) -> Result<Option<WhoisCacheEntry>> {
    let cache_file = cache_file(cache_path, domain);

    if !cache_file.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&cache_file).context("Failed to read cache file")?;
    let entry: WhoisCacheEntry =
        serde_json::from_str(&content).context("Failed to parse cache file")?;

    let age = entry.cached_at.elapsed().unwrap_or_default();
    if age.as_secs() > ttl_secs {
        let _ = std::fs::remove_file(&cache_file);
        return Ok(None);
    }

    Ok(Some(entry))
}

/// Saves a registrant to the disk cache.
///
/// Written to a temporary file and renamed into place, so readers never see
/// a partial entry.
pub(crate) fn save_to_cache(cache_path: &Path, domain: &str, registrant: &Registrant) -> Result<()> {
    std::fs::create_dir_all(cache_path).context("Failed to create cache directory")?;

    let entry = WhoisCacheEntry {
        registrant: registrant.clone(),
        cached_at: SystemTime::now(),
        domain: domain.to_string(),
    };

    let content =
        serde_json::to_string_pretty(&entry).context("Failed to serialize cache entry")?;
    let target = cache_file(cache_path, domain);
    let staging = tempfile::NamedTempFile::new_in(cache_path)
        .context("Failed to create temporary cache file")?;
    std::fs::write(staging.path(), content).context("Failed to write cache file")?;
    staging
        .persist(&target)
        .context("Failed to move cache file into place")?;

    Ok(())
}
