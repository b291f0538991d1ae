use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the menu analysis service.
    pub api_url: Url,
    pub bind_addr: SocketAddr,
    /// `None` waits forever on the analysis service.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Reads `MENU_API_URL`, `BIND_ADDR` and `MENU_API_TIMEOUT_SECS`.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url_raw = lookup("MENU_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url_raw).map_err(|e| ConfigError::Invalid {
            name: "MENU_API_URL",
            value: api_url_raw.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                name: "MENU_API_URL",
                value: api_url_raw,
                reason: "scheme must be http or https".to_string(),
            });
        }

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let request_timeout = match lookup("MENU_API_TIMEOUT_SECS") {
            None => Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: "MENU_API_TIMEOUT_SECS",
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Config {
            api_url,
            bind_addr,
            request_timeout,
        })
    }

    /// Full URL of the menu processing endpoint.
    pub fn process_menu_url(&self) -> String {
        process_menu_url(&self.api_url)
    }
}

pub(crate) fn process_menu_url(base: &Url) -> String {
    format!("{}/api/process-menu", base.as_str().trim_end_matches('/'))
}
