//! Runtime configuration
//!
//! Read once at startup from environment variables. Every value has a
//! default, so an empty environment yields a working configuration that
//! talks to the public explorers.

use crate::types::Network;
use crate::utils::network_config::validate_explorer_url;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

pub const ENV_ETHEREUM_URL: &str = "TX_FETCHER_ETHEREUM_URL";
pub const ENV_BSC_URL: &str = "TX_FETCHER_BSC_URL";
pub const ENV_TIMEOUT_SECS: &str = "TX_FETCHER_TIMEOUT_SECS";
pub const ENV_PARALLEL: &str = "TX_FETCHER_PARALLEL";
pub const ENV_FETCH_THREADS: &str = "TX_FETCHER_FETCH_THREADS";
pub const ENV_DEBUG: &str = "TX_FETCHER_DEBUG";
pub const ENV_BIND: &str = "TX_FETCHER_BIND";
pub const ENV_PORT: &str = "PORT";

pub const DEFAULT_PORT: u16 = 5000;
/// Each period keeps up to three pool threads busy
pub const DEFAULT_FETCH_THREADS: usize = 16;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid explorer URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Explorer base URL per network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerEndpoints {
    pub ethereum: String,
    pub bsc: String,
}

impl ExplorerEndpoints {
    pub fn base_url(&self, network: Network) -> &str {
        match network {
            Network::Ethereum => &self.ethereum,
            Network::Bsc => &self.bsc,
        }
    }
}

impl Default for ExplorerEndpoints {
    fn default() -> Self {
        Self {
            ethereum: Network::Ethereum.default_base_url().to_string(),
            bsc: Network::Bsc.default_base_url().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub endpoints: ExplorerEndpoints,
    /// Upstream request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Fetch the three categories concurrently
    pub parallel: bool,
    /// Size of the dedicated category fetch pool
    pub fetch_threads: usize,
    pub debug: bool,
    pub bind: SocketAddr,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoints: ExplorerEndpoints::default(),
            timeout: None,
            parallel: true,
            fetch_threads: DEFAULT_FETCH_THREADS,
            debug: false,
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        }
    }
}

impl FetcherConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let ethereum = match get(ENV_ETHEREUM_URL) {
            Some(url) => checked_url(ENV_ETHEREUM_URL, &url)?,
            None => defaults.endpoints.ethereum,
        };
        let bsc = match get(ENV_BSC_URL) {
            Some(url) => checked_url(ENV_BSC_URL, &url)?,
            None => defaults.endpoints.bsc,
        };

        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    return Err(ConfigError::InvalidValue { var: ENV_TIMEOUT_SECS, value: raw })
                }
            },
            None => defaults.timeout,
        };

        let parallel = match get(ENV_PARALLEL) {
            Some(raw) => parse_flag(ENV_PARALLEL, &raw)?,
            None => defaults.parallel,
        };
        let fetch_threads = match get(ENV_FETCH_THREADS) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidValue { var: ENV_FETCH_THREADS, value: raw }),
            },
            None => defaults.fetch_threads,
        };
        let debug = match get(ENV_DEBUG) {
            Some(raw) => parse_flag(ENV_DEBUG, &raw)?,
            None => defaults.debug,
        };

        let host: IpAddr = match get(ENV_BIND) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: ENV_BIND, value: raw })?,
            None => defaults.bind.ip(),
        };
        let port: u16 = match get(ENV_PORT) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: ENV_PORT, value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            endpoints: ExplorerEndpoints { ethereum, bsc },
            timeout,
            parallel,
            fetch_threads,
            debug,
            bind: SocketAddr::new(host, port),
        })
    }
}

fn checked_url(var: &'static str, url: &str) -> Result<String, ConfigError> {
    let validation = validate_explorer_url(url);
    for warning in &validation.warnings {
        crate::log_warn!("config", "Explorer endpoint warning", var = var, warning = warning);
    }
    if !validation.is_valid {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: validation.errors.join("; "),
        });
    }
    // Keep the operator's spelling; Url normalisation may append a slash
    Ok(url.to_string())
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var, value: raw.to_string() }),
    }
}
