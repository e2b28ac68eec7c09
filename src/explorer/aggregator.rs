//! Transaction Aggregator
//!
//! Fetches normal, token and internal transactions for one address over an
//! inclusive block range and tags every record with its category.

use super::client::ExplorerClient;
use crate::error::{FetchError, FetchResult};
use crate::types::{BlockRange, PeriodTransactions, TransactionRecord, TxCategory};
use rayon::ThreadPool;
use serde_json::Value;

impl ExplorerClient<'_> {
    /// Fetch one category, oldest first
    pub fn fetch_category(
        &self,
        address: &str,
        category: TxCategory,
        start_block: u64,
        end_block: u64,
    ) -> FetchResult<Vec<TransactionRecord>> {
        crate::log_debug!("aggregator", "Fetching transactions",
            category = category, address = address,
            start_block = start_block, end_block = end_block);

        let envelope = self.call(vec![
            ("module", "account".to_string()),
            ("action", category.action().to_string()),
            ("address", address.to_string()),
            ("startblock", start_block.to_string()),
            ("endblock", end_block.to_string()),
            ("sort", "asc".to_string()),
        ])?;

        if !envelope.is_success() {
            if envelope.is_empty_result() {
                return Ok(Vec::new());
            }
            let reason = envelope.reason();
            crate::log_warn!("aggregator", "Explorer rejected transaction list",
                category = category, reason = reason);
            return Err(FetchError::upstream(format!(
                "Error fetching {} transactions: {}",
                category, reason
            )));
        }

        let entries = match envelope.result {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            other => {
                return Err(FetchError::parse_error(format!(
                    "Expected a list of {} transactions, got: {}",
                    category, other
                )))
            }
        };

        entries
            .into_iter()
            .map(|entry| {
                let mut record = TransactionRecord::from_value(entry).ok_or_else(|| {
                    FetchError::parse_error(format!(
                        "Explorer returned a non-object {} transaction",
                        category
                    ))
                })?;
                record.tag(category);
                Ok(record)
            })
            .collect()
    }

    /// Fetch all three categories over `range`; any failure fails the whole call.
    /// With a `pool` the categories run concurrently on it, otherwise one
    /// after another. When several categories fail, the first in
    /// `normal, erc20, internal` order is reported regardless of completion order.
    pub fn fetch_all(
        &self,
        address: &str,
        range: BlockRange,
        pool: Option<&ThreadPool>,
    ) -> FetchResult<PeriodTransactions> {
        let fetch = |category| self.fetch_category(address, category, range.start_block, range.end_block);

        let (normal, (erc20, internal)) = match pool {
            Some(pool) => pool.install(|| {
                rayon::join(
                    || fetch(TxCategory::Normal),
                    || rayon::join(|| fetch(TxCategory::Erc20), || fetch(TxCategory::Internal)),
                )
            }),
            None => {
                let normal = fetch(TxCategory::Normal);
                (normal, (fetch(TxCategory::Erc20), fetch(TxCategory::Internal)))
            }
        };

        Ok(PeriodTransactions {
            normal: normal?,
            erc20: erc20?,
            internal: internal?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::explorer::transport::testing::ScriptedTransport;
    use serde_json::json;

    const URL: &str = "https://api.etherscan.io/api";
    const ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn pool() -> ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap()
    }

    fn ok_list(hashes: &[&str]) -> Value {
        let result: Vec<Value> = hashes.iter().map(|h| json!({"hash": h, "value": "0"})).collect();
        json!({"status": "1", "message": "OK", "result": result})
    }

    #[test]
    fn test_fetch_category_tags_records() {
        let transport = ScriptedTransport::new()
            .respond("txlist", ok_list(&["0x1", "0x2"]))
            .respond("tokentx", ok_list(&["0x3"]))
            .respond("txlistinternal", ok_list(&["0x4"]));
        let client = ExplorerClient::new(&transport, URL, "KEY");

        for category in TxCategory::ALL {
            let records = client.fetch_category(ADDRESS, category, 100, 200).unwrap();
            assert!(!records.is_empty());
            assert!(records.iter().all(|r| r.tx_type() == Some(category.as_str())));
        }
    }

    #[test]
    fn test_fetch_category_request_parameters() {
        let transport = ScriptedTransport::new().respond("tokentx", ok_list(&[]));
        let client = ExplorerClient::new(&transport, URL, "KEY");

        client.fetch_category(ADDRESS, TxCategory::Erc20, 100, 200).unwrap();

        let calls = transport.calls_for("tokentx");
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call["module"], "account");
        assert_eq!(call["address"], ADDRESS);
        assert_eq!(call["startblock"], "100");
        assert_eq!(call["endblock"], "200");
        assert_eq!(call["sort"], "asc");
        assert_eq!(call["apikey"], "KEY");
    }

    #[test]
    fn test_no_transactions_found_is_empty() {
        for message in ["No transactions found", "no transactions found", "0"] {
            let transport = ScriptedTransport::new()
                .respond("txlist", json!({"status": "0", "message": message, "result": []}));
            let client = ExplorerClient::new(&transport, URL, "KEY");

            let records = client.fetch_category(ADDRESS, TxCategory::Normal, 1, 2).unwrap();
            assert!(records.is_empty(), "{}", message);
        }
    }

    #[test]
    fn test_rate_limit_is_upstream_error() {
        let transport = ScriptedTransport::new().respond(
            "txlistinternal",
            json!({"status": "0", "message": "Max rate limit reached"}),
        );
        let client = ExplorerClient::new(&transport, URL, "KEY");

        let err = client.fetch_category(ADDRESS, TxCategory::Internal, 1, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::Upstream);
        assert!(err.message.contains("Max rate limit reached"));
        assert!(err.message.contains("internal"));
    }

    #[test]
    fn test_non_object_record_is_parse_error() {
        let transport = ScriptedTransport::new()
            .respond("txlist", json!({"status": "1", "message": "OK", "result": ["0xabc"]}));
        let client = ExplorerClient::new(&transport, URL, "KEY");

        let err = client.fetch_category(ADDRESS, TxCategory::Normal, 1, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::Parse);
    }

    #[test]
    fn test_fetch_all_sequential_and_parallel_agree() {
        let transport = ScriptedTransport::new()
            .respond("txlist", ok_list(&["0x1"]))
            .respond("tokentx", ok_list(&["0x2", "0x3"]))
            .respond("txlistinternal", json!({"status": "0", "message": "No transactions found", "result": []}));
        let client = ExplorerClient::new(&transport, URL, "KEY");

        let sequential = client.fetch_all(ADDRESS, BlockRange::new(100, 200), None).unwrap();
        let parallel = client.fetch_all(ADDRESS, BlockRange::new(100, 200), Some(&pool())).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.normal.len(), 1);
        assert_eq!(sequential.erc20.len(), 2);
        assert!(sequential.internal.is_empty());
        assert_eq!(transport.call_count(), 6);
    }

    #[test]
    fn test_fetch_all_reports_first_failing_category() {
        let transport = ScriptedTransport::new()
            .respond("txlist", ok_list(&["0x1"]))
            .respond("tokentx", json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"}))
            .respond("txlistinternal", json!({"status": "0", "message": "Max rate limit reached"}));
        let client = ExplorerClient::new(&transport, URL, "KEY");

        let pool = pool();
        for pool in [None, Some(&pool)] {
            let err = client.fetch_all(ADDRESS, BlockRange::new(1, 2), pool).unwrap_err();
            assert!(err.message.contains("erc20"), "{}", err);
            assert!(err.message.contains("Invalid API Key"));
        }
    }
}
