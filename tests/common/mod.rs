//! Shared test doubles for the explorer API
#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tx_fetcher::explorer::QueryParams;
use tx_fetcher::{ExplorerTransport, FetchError, FetchResult};

pub const ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

/// In-memory explorer keyed by `action` (plus `closest` for block lookups)
#[derive(Default)]
pub struct MockExplorer {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl MockExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), body);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// (base_url, params) of every call with the given action
    pub fn calls_for(&self, action: &str) -> Vec<(String, HashMap<String, String>)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, params)| params.get("action").map(String::as_str) == Some(action))
            .cloned()
            .collect()
    }
}

impl ExplorerTransport for MockExplorer {
    fn get(&self, base_url: &str, params: &QueryParams) -> FetchResult<Value> {
        let params: HashMap<String, String> =
            params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        self.calls.lock().unwrap().push((base_url.to_string(), params.clone()));

        let action = params.get("action").cloned().unwrap_or_default();
        let key = match params.get("closest") {
            Some(closest) => format!("{}:{}", action, closest),
            None => action,
        };
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::network(format!("unexpected explorer call: {}", key)))
    }
}

pub fn block(number: u64) -> Value {
    json!({"status": "1", "message": "OK", "result": number.to_string()})
}

pub fn tx(hash: &str, block_number: u64) -> Value {
    json!({
        "blockNumber": block_number.to_string(),
        "timeStamp": "1704067200",
        "hash": hash,
        "from": ADDRESS,
        "to": "0x0000000000000000000000000000000000000001",
        "value": "1000000000000000000",
    })
}

pub fn tx_list(txs: Vec<Value>) -> Value {
    json!({"status": "1", "message": "OK", "result": txs})
}

/// Blocks 100 (after 2024-01-01) and 200 (before 2024-01-31) with two
/// normal, one token and one internal transaction in between
pub fn january_explorer() -> MockExplorer {
    MockExplorer::new()
        .respond("getblocknobytime:after", block(100))
        .respond("getblocknobytime:before", block(200))
        .respond("txlist", tx_list(vec![tx("0xn1", 100), tx("0xn2", 150)]))
        .respond("tokentx", tx_list(vec![tx("0xe1", 120)]))
        .respond("txlistinternal", tx_list(vec![tx("0xi1", 200)]))
}
