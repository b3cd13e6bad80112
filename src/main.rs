//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ssl_posture` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use ssl_posture::config::{
    DB_PATH, DEFAULT_LOGO_API_URL, DEFAULT_PORT, DEFAULT_SCAN_API_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, DEFAULT_WHOIS_CACHE_DIR, SCAN_MAX_POLLS, SCAN_POLL_INTERVAL_MS,
};
use ssl_posture::initialization::{init_client, init_logger_with};
use ssl_posture::page::PageFetcher;
use ssl_posture::scan::ScanClient;
use ssl_posture::server::{start_server, AppState};
use ssl_posture::{open_store, whois_lookup, Assessor, Config, LogFormat, LogLevel, PageMetadata};

/// TLS posture assessment with change history.
#[derive(Debug, Parser)]
#[command(name = "ssl_posture", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    log_format: LogFormat,

    /// SQLite database path
    #[arg(long, env = "SSL_POSTURE_DB", default_value = DB_PATH, global = true)]
    db_path: PathBuf,

    /// Disable WHOIS/RDAP registrant lookup
    #[arg(long, global = true)]
    no_whois: bool,

    /// WHOIS cache directory
    #[arg(long, env = "SSL_POSTURE_WHOIS_CACHE", default_value = DEFAULT_WHOIS_CACHE_DIR, global = true)]
    whois_cache_dir: PathBuf,

    /// SSL Labs API base URL
    #[arg(long, env = "SSL_POSTURE_SCAN_API", default_value = DEFAULT_SCAN_API_URL, global = true)]
    scan_api_url: String,

    /// Icon lookup API URL
    #[arg(long, env = "SSL_POSTURE_LOGO_API", default_value = DEFAULT_LOGO_API_URL, global = true)]
    logo_api_url: String,

    /// Outbound HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,

    /// Maximum scan API polls while a scan is in progress
    #[arg(long, default_value_t = SCAN_MAX_POLLS, global = true)]
    scan_max_polls: usize,

    /// Delay between scan API polls in milliseconds
    #[arg(long, default_value_t = SCAN_POLL_INTERVAL_MS, global = true)]
    scan_poll_interval_ms: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, env = "SSL_POSTURE_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Assess one domain and record the snapshot
    Assess {
        /// Domain to assess
        domain: String,

        /// Read the SSL Labs report from this file instead of calling the API
        #[arg(long)]
        scan_file: Option<PathBuf>,

        /// Skip the page title and logo lookup
        #[arg(long)]
        no_page: bool,
    },
    /// List assessed domains, or the snapshots of one domain
    History {
        /// Domain whose snapshots to list
        domain: Option<String>,
    },
}

impl GlobalArgs {
    fn into_config(self, port: Option<u16>) -> Config {
        Config {
            log_level: self.log_level,
            log_format: self.log_format,
            db_path: self.db_path,
            port: port.unwrap_or(DEFAULT_PORT),
            enable_whois: !self.no_whois,
            whois_cache_dir: self.whois_cache_dir,
            scan_api_url: self.scan_api_url,
            logo_api_url: self.logo_api_url,
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent,
            scan_max_polls: self.scan_max_polls,
            scan_poll_interval_ms: self.scan_poll_interval_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from the current directory, then from next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let port = match &cli.command {
        Command::Serve { port } => Some(*port),
        _ => None,
    };
    let config = cli.global.into_config(port);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli.command, config).await {
        eprintln!("ssl_posture error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, config: Config) -> Result<()> {
    let store = open_store(&config.db_path)
        .await
        .context("Failed to initialize database")?;

    match command {
        Command::Serve { .. } => {
            let client = init_client(&config).context("Failed to initialize HTTP client")?;
            let state = AppState::new(
                Assessor::new(store, whois_lookup(&config)),
                ScanClient::from_config(client.clone(), &config),
                PageFetcher::new(client, config.logo_api_url.clone()),
            );
            start_server(config.port, state).await
        }
        Command::Assess {
            domain,
            scan_file,
            no_page,
        } => {
            let domain = ssl_posture::domain::normalize_domain(&domain)?;
            let client = init_client(&config).context("Failed to initialize HTTP client")?;

            let raw_scan = match scan_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read scan report {}", path.display()))?,
                None => ScanClient::from_config(client.clone(), &config)
                    .fetch_report(&domain)
                    .await
                    .context("Failed to fetch scan report")?,
            };
            let page = if no_page {
                PageMetadata::default()
            } else {
                PageFetcher::new(client, config.logo_api_url.clone())
                    .fetch(&domain)
                    .await
            };

            let assessor = Assessor::new(store, whois_lookup(&config));
            let snapshot = assessor.assess(&domain, &raw_scan, page).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Command::History { domain: None } => {
            let items = store.list_domains().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ssl_posture::HistoryIndex { items })?
            );
            Ok(())
        }
        Command::History {
            domain: Some(domain),
        } => {
            let domain = ssl_posture::domain::normalize_domain(&domain)?;
            let items = store.domain_history(&domain).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ssl_posture::server::DomainHistory { domain, items })?
            );
            Ok(())
        }
    }
}
