use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/96.0.4664.45 Safari/537.36";

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.booking.com/searchresults.pl.html";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub theme_path: PathBuf,
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub search_base_url: String,
    pub max_workers: usize,
}

impl AppConfig {
    /// Table written by the listing stage.
    pub fn listing_table_path(&self) -> PathBuf {
        self.data_dir.join(crate::table::LISTING_FILE)
    }

    /// Table written (and rewritten after every page) by the detail stage.
    pub fn enriched_table_path(&self) -> PathBuf {
        self.data_dir.join(crate::table::ENRICHED_FILE)
    }
}

/// Load configuration from the process environment after reading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Every setting has a default, so only malformed values are errors.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_var = "HOTEL_SCOUT_BIND_ADDR";
    let bind_addr = or_default(bind_var, "127.0.0.1:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid(bind_var, e.to_string()))?;

    let timeout_var = "HOTEL_SCOUT_REQUEST_TIMEOUT_SECS";
    let request_timeout_secs = or_default(timeout_var, "60")
        .parse::<u64>()
        .map_err(|e| invalid(timeout_var, e.to_string()))?;

    let workers_var = "HOTEL_SCOUT_MAX_WORKERS";
    let max_workers = or_default(workers_var, "8")
        .parse::<usize>()
        .map_err(|e| invalid(workers_var, e.to_string()))?;
    if max_workers == 0 {
        return Err(invalid(workers_var, "must be at least 1".into()));
    }

    let base_var = "HOTEL_SCOUT_SEARCH_BASE_URL";
    let search_base_url = or_default(base_var, DEFAULT_SEARCH_BASE_URL);
    url::Url::parse(&search_base_url).map_err(|e| invalid(base_var, e.to_string()))?;

    Ok(AppConfig {
        bind_addr,
        data_dir: PathBuf::from(or_default("HOTEL_SCOUT_DATA_DIR", "data")),
        theme_path: PathBuf::from(or_default("HOTEL_SCOUT_THEME_PATH", "assets/theme.json")),
        log_level: or_default("HOTEL_SCOUT_LOG_LEVEL", "info"),
        user_agent: or_default("HOTEL_SCOUT_USER_AGENT", DEFAULT_USER_AGENT),
        request_timeout_secs,
        search_base_url,
        max_workers,
    })
}
