//! Per-request explorer handle: transport, endpoint and API key bundled
//! together so resolver and aggregator calls only carry what varies.

use super::envelope::ExplorerEnvelope;
use super::transport::ExplorerTransport;
use crate::error::FetchResult;

#[derive(Clone, Copy)]
pub struct ExplorerClient<'a> {
    transport: &'a dyn ExplorerTransport,
    base_url: &'a str,
    api_key: &'a str,
}

impl<'a> ExplorerClient<'a> {
    pub fn new(transport: &'a dyn ExplorerTransport, base_url: &'a str, api_key: &'a str) -> Self {
        Self { transport, base_url, api_key }
    }

    /// GET with `apikey` appended, decoded into the response envelope
    pub(crate) fn call(&self, mut params: Vec<(&'static str, String)>) -> FetchResult<ExplorerEnvelope> {
        params.push(("apikey", self.api_key.to_string()));
        let body = self.transport.get(self.base_url, &params)?;
        ExplorerEnvelope::from_value(body)
    }
}

impl std::fmt::Debug for ExplorerClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
