use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables. Everything has a
/// default; the client is usable with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the screening service.
    pub api_url: String,
    /// Transport timeout applied to every request. There are no retries, so
    /// this is also the upper bound on how long an operation stays in flight.
    pub request_timeout: Duration,
    /// Override for the directory holding the durable client state file.
    /// Defaults to the platform config directory when unset.
    pub state_dir: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("SCREENER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("SCREENER_TIMEOUT_SECS must be a number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_url: std::env::var("SCREENER_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            state_dir: std::env::var("SCREENER_STATE_DIR").ok().map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_dir: None,
            rust_log: "info".to_string(),
        }
    }
}
