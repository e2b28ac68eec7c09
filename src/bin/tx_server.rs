//! HTTP server exposing `GET /api/transactions`

use tx_fetcher::server::{serve, AppState};
use tx_fetcher::utils::logging;
use tx_fetcher::{log_info, FetcherConfig, PeriodFetcher};

fn main() -> anyhow::Result<()> {
    let config = FetcherConfig::from_env()?;
    if config.debug {
        logging::enable_debug();
    }

    // The blocking HTTP client must be created and dropped outside the async runtime
    let fetcher = PeriodFetcher::from_config(&config)?;
    log_info!("main", "Explorer endpoints configured",
        ethereum = config.endpoints.ethereum,
        bsc = config.endpoints.bsc,
        parallel = config.parallel,
        fetch_threads = config.fetch_threads);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(serve(config.bind, AppState::new(fetcher.clone())));
    drop(runtime);
    drop(fetcher);

    result
}
