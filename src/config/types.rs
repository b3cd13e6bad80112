//! Configuration types.
//!
//! This module defines the logging option enums (shared with the CLI through
//! `clap::ValueEnum`) and the library `Config` struct.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    DB_PATH, DEFAULT_LOGO_API_URL, DEFAULT_PORT, DEFAULT_SCAN_API_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, DEFAULT_WHOIS_CACHE_DIR, SCAN_MAX_POLLS, SCAN_POLL_INTERVAL_MS,
};

/// Log verbosity, selectable with `--log-level`.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    /// Default: one line per assessment plus warnings
    Info,
    /// Adds cache hits, poll attempts and rejected requests
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log line format, selectable with `--log-format`.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Colored, human-readable lines
    Plain,
    /// One JSON object per line (`ts`, `level`, `target`, `msg`)
    Json,
}

/// Library configuration.
///
/// Built by the binary from command-line flags and environment variables, or
/// constructed programmatically.
///
/// # Examples
///
/// ```no_run
/// use ssl_posture::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("./history.db"),
///     enable_whois: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// HTTP server port
    pub port: u16,

    /// Enable WHOIS/RDAP lookup of the domain registrant
    pub enable_whois: bool,

    /// Directory used to cache WHOIS results
    pub whois_cache_dir: PathBuf,

    /// SSL Labs API base URL
    pub scan_api_url: String,

    /// Icon lookup API URL
    pub logo_api_url: String,

    /// Per-request timeout in seconds for outbound HTTP calls
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Maximum number of scan API polls while a report is in progress
    pub scan_max_polls: usize,

    /// Delay between scan API polls in milliseconds
    pub scan_poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            port: DEFAULT_PORT,
            enable_whois: true,
            whois_cache_dir: PathBuf::from(DEFAULT_WHOIS_CACHE_DIR),
            scan_api_url: DEFAULT_SCAN_API_URL.to_string(),
            logo_api_url: DEFAULT_LOGO_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            scan_max_polls: SCAN_MAX_POLLS,
            scan_poll_interval_ms: SCAN_POLL_INTERVAL_MS,
        }
    }
}
