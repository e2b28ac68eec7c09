//! Explorer Module
//!
//! Date-to-block resolution and transaction aggregation against
//! Etherscan-compatible explorers (Etherscan, BscScan).

mod aggregator;
mod client;
mod envelope;
mod period;
mod resolver;
mod transport;

pub use client::ExplorerClient;
pub use envelope::ExplorerEnvelope;
pub use period::{get_transactions_for_period, PeriodFetcher};
pub use resolver::{local_timestamp, parse_date, DATE_FORMAT, DATE_TIME_FORMAT};
pub use transport::{ExplorerTransport, QueryParams, ReqwestTransport};
