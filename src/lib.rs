//! tx-fetcher Core Library
//!
//! Retrieves a wallet's transaction history from Etherscan-compatible block
//! explorers for a date-bounded window.
//!
//! # Architecture
//!
//! This crate provides:
//! - **explorer**: date-to-block resolution, per-category transaction fetches
//!   and period orchestration
//! - **server**: the `GET /api/transactions` endpoint
//! - **config**: environment-driven configuration
//! - **utils**: redacting structured logging, JSON helpers, endpoint validation
//!
//! # Example
//!
//! ```rust,ignore
//! use tx_fetcher::{FetcherConfig, PeriodFetcher, PeriodQuery};
//!
//! let fetcher = PeriodFetcher::from_config(&FetcherConfig::from_env()?)?;
//! let query = PeriodQuery::new(address, "2024-01-01", "2024-01-31", "ethereum", Some(api_key));
//! let history = fetcher.get_transactions_for_period(&query)?;
//! println!("{} normal transactions", history.normal.len());
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod server;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use config::{ConfigError, ExplorerEndpoints, FetcherConfig};
pub use error::{ErrorCode, FetchError, FetchResult};
pub use explorer::{
    get_transactions_for_period, ExplorerClient, ExplorerTransport, PeriodFetcher, ReqwestTransport,
};
pub use types::*;
