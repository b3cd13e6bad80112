//! Configuration constants.
//!
//! Defaults for the collaborators around the assessment pipeline: the SSL Labs
//! scan API, the page/logo fetchers, the HTTP server and the SQLite store.

/// Default SQLite database path.
pub const DB_PATH: &str = "./ssl_posture.db";

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 3003;

/// SSL Labs v3 API base URL (the `analyze` endpoint is appended).
pub const DEFAULT_SCAN_API_URL: &str = "https://api.ssllabs.com/api/v3";

/// Icon lookup service returning `{ "url": ..., "icons": [...] }`.
pub const DEFAULT_LOGO_API_URL: &str = "https://besticon-demo.herokuapp.com/allicons.json";

/// Per-request HTTP timeout in seconds for outbound calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent string for outbound HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("ssl_posture/", env!("CARGO_PKG_VERSION"));

// Scan polling
/// Maximum number of times the scan API is polled before giving up on a
/// report that is still in progress.
pub const SCAN_MAX_POLLS: usize = 30;
/// Delay between two polls of the scan API in milliseconds.
/// SSL Labs asks clients to wait at least 5s between in-progress polls.
pub const SCAN_POLL_INTERVAL_MS: u64 = 10_000;

// Response size limits
/// Maximum page body size in bytes scanned for a `<title>` (2MB)
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Default WHOIS cache directory
pub const DEFAULT_WHOIS_CACHE_DIR: &str = ".whois_cache";

/// WHOIS cache TTL: 7 days (registrant data changes infrequently)
pub const WHOIS_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
