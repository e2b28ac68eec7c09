//! Explorer Transport
//!
//! The single seam between the fetch logic and the network. Production code
//! uses [`ReqwestTransport`]; tests substitute scripted transports.

use crate::error::{FetchError, FetchResult};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Query parameters of one explorer call
pub type QueryParams = [(&'static str, String)];

/// Performs one GET against an explorer and returns the decoded JSON body
pub trait ExplorerTransport: Send + Sync {
    fn get(&self, base_url: &str, params: &QueryParams) -> FetchResult<Value>;
}

/// Blocking HTTP transport
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport; `None` disables the request timeout
    pub fn new(timeout: Option<Duration>) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tx-fetcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl ExplorerTransport for ReqwestTransport {
    fn get(&self, base_url: &str, params: &QueryParams) -> FetchResult<Value> {
        let response = self.client
            .get(base_url)
            .query(params)
            .send()
            .map_err(|e| FetchError::from(e).with_details(base_url.to_string()))?;

        // The explorer reports failures in the body; the HTTP status is informational
        let status = response.status();
        if !status.is_success() {
            crate::log_warn!("transport", "Explorer returned non-success HTTP status",
                status = status.as_u16(), endpoint = base_url);
        }

        let body = response.text().map_err(|e| {
            FetchError::network(format!("Failed to read explorer response: {}", e.without_url()))
        })?;

        crate::utils::parse_json_value(&body)
            .map_err(|e| e.with_details(format!("HTTP {} from {}", status.as_u16(), base_url)))
    }
}
