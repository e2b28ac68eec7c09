//! Period Orchestration
//!
//! Validates a [`PeriodQuery`], bounds the date span inward to a block range
//! and aggregates the three transaction categories over it.

use super::client::ExplorerClient;
use super::transport::{ExplorerTransport, ReqwestTransport};
use crate::config::{ExplorerEndpoints, FetcherConfig, DEFAULT_FETCH_THREADS};
use crate::error::{FetchError, FetchResult};
use crate::types::{BlockRange, Closest, Network, PeriodQuery, PeriodTransactions};
use rayon::{ThreadPool, ThreadPoolBuilder};
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Long-lived entry point shared by the HTTP endpoint and the command line
#[derive(Clone)]
pub struct PeriodFetcher {
    transport: Arc<dyn ExplorerTransport>,
    endpoints: ExplorerEndpoints,
    /// Category fetches block on the network, so they get their own pool
    /// instead of rayon's global one. `None` fetches sequentially.
    pool: Option<Arc<ThreadPool>>,
}

impl PeriodFetcher {
    pub fn new(transport: Arc<dyn ExplorerTransport>, endpoints: ExplorerEndpoints) -> Self {
        Self {
            transport,
            endpoints,
            pool: fetch_pool(DEFAULT_FETCH_THREADS),
        }
    }

    /// Production fetcher over HTTP using the configured endpoints and timeout
    pub fn from_config(config: &FetcherConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self {
            transport: Arc::new(transport),
            endpoints: config.endpoints.clone(),
            pool: if config.parallel { fetch_pool(config.fetch_threads) } else { None },
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        if !parallel {
            self.pool = None;
        } else if self.pool.is_none() {
            self.pool = fetch_pool(DEFAULT_FETCH_THREADS);
        }
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// All transactions of `query.address` between the two dates.
    ///
    /// The start date snaps to the first block at or after it and the end
    /// date to the last block at or before it, so the window never exceeds
    /// the requested span. Every input is validated before the first
    /// explorer call.
    pub fn get_transactions_for_period(&self, query: &PeriodQuery) -> FetchResult<PeriodTransactions> {
        let network: Network = query.network.parse()?;

        let api_key = query
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| FetchError::validation("API key is required for the selected network."))?;

        let start = super::parse_date(&query.start_date)?;
        let end = super::parse_date(&query.end_date)?;
        if end < start {
            return Err(FetchError::validation(format!(
                "End date '{}' is earlier than start date '{}'",
                query.end_date, query.start_date
            )));
        }

        crate::log_info!("period", "Fetching transactions for period",
            network = network, address = query.address,
            start_date = query.start_date, end_date = query.end_date);

        let client = ExplorerClient::new(self.transport.as_ref(), self.endpoints.base_url(network), api_key);

        let range = BlockRange::new(
            client.resolve_block(&query.start_date, Closest::After)?,
            client.resolve_block(&query.end_date, Closest::Before)?,
        );

        if range.is_empty() {
            crate::log_info!("period", "No block falls inside the period",
                start_block = range.start_block, end_block = range.end_block);
            return Ok(PeriodTransactions::default());
        }

        let transactions = client.fetch_all(&query.address, range, self.pool.as_deref())?;

        crate::log_info!("period", "Fetched transactions",
            normal = transactions.normal.len(),
            erc20 = transactions.erc20.len(),
            internal = transactions.internal.len());

        Ok(transactions)
    }
}

fn fetch_pool(threads: usize) -> Option<Arc<ThreadPool>> {
    match ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("tx-fetch-{}", i))
        .build()
    {
        Ok(pool) => Some(Arc::new(pool)),
        Err(e) => {
            crate::log_warn!("period", "Fetch pool unavailable, fetching categories sequentially",
                threads = threads, error = e);
            None
        }
    }
}

/// One-shot variant against the public explorers
pub fn get_transactions_for_period(
    transport: Arc<dyn ExplorerTransport>,
    address: &str,
    start_date: &str,
    end_date: &str,
    network: &str,
    api_key: Option<&str>,
) -> FetchResult<PeriodTransactions> {
    let query = PeriodQuery::new(address, start_date, end_date, network, api_key.map(str::to_string));
    PeriodFetcher::new(transport, ExplorerEndpoints::default()).get_transactions_for_period(&query)
}
