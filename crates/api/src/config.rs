//! Application configuration loaded from environment variables.

use domain::{AuthError, StaticCredentials};
use projections::ReportOptions;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: Postgres connection string; unset keeps everything in memory
/// - `ADMIN_ACCOUNTS`: comma-separated `user:password` pairs (default: none)
/// - `SESSION_TTL_SECS`: admin session lifetime (default: `28800`)
/// - `BALLOT_TTL_SECS`: how long an unfinished ballot is kept (default: `3600`)
/// - `SWEEP_INTERVAL_SECS`: how often expired ballots and sessions are dropped (default: `60`)
/// - `REPORT_LINES_PER_PAGE`: page height of the exported report (default: `60`)
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub admin_accounts: String,
    pub session_ttl_secs: i64,
    pub ballot_ttl_secs: i64,
    pub sweep_interval_secs: u64,
    pub report_lines_per_page: usize,
}

/// Upper bound for configured lifetimes, in seconds (about 136 years).
const MAX_TTL_SECS: i64 = u32::MAX as i64;

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            admin_accounts: lookup("ADMIN_ACCOUNTS").unwrap_or(defaults.admin_accounts),
            session_ttl_secs: lookup("SESSION_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| (1..=MAX_TTL_SECS).contains(secs))
                .unwrap_or(defaults.session_ttl_secs),
            ballot_ttl_secs: lookup("BALLOT_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| (1..=MAX_TTL_SECS).contains(secs))
                .unwrap_or(defaults.ballot_ttl_secs),
            sweep_interval_secs: lookup("SWEEP_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval_secs),
            report_lines_per_page: lookup("REPORT_LINES_PER_PAGE")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.report_lines_per_page),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the admin allow-list.
    pub fn credentials(&self) -> Result<StaticCredentials, AuthError> {
        StaticCredentials::parse(&self.admin_accounts)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs.clamp(1, MAX_TTL_SECS))
    }

    pub fn ballot_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ballot_ttl_secs.clamp(1, MAX_TTL_SECS))
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions::default().with_lines_per_page(self.report_lines_per_page)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            admin_accounts: String::new(),
            session_ttl_secs: 8 * 60 * 60,
            ballot_ttl_secs: crate::state::DEFAULT_BALLOT_TTL_SECS,
            sweep_interval_secs: 60,
            report_lines_per_page: 60,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("admin_accounts", &"<redacted>")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("ballot_ttl_secs", &self.ballot_ttl_secs)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .field("report_lines_per_page", &self.report_lines_per_page)
            .finish()
    }
}
