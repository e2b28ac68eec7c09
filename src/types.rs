//! Shared types for tx-fetcher
//!
//! Data structures that cross module boundaries are defined here
//! for consistent serialization.

use crate::error::FetchError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Network Types
// =============================================================================

/// Explorer networks the fetcher can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Bsc,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Ethereum, Network::Bsc];

    /// Public explorer endpoint used when no override is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Network::Ethereum => "https://api.etherscan.io/api",
            Network::Bsc => "https://api.bscscan.com/api",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Bsc => "bsc",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Ethereum
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Network {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" => Ok(Network::Ethereum),
            "bsc" => Ok(Network::Bsc),
            _ => Err(FetchError::validation(format!(
                "Unsupported network '{}'. Choose 'ethereum' or 'bsc'.",
                s
            ))),
        }
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Kind of ledger event requested from the explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxCategory {
    Normal,
    Erc20,
    Internal,
}

impl TxCategory {
    pub const ALL: [TxCategory; 3] = [TxCategory::Normal, TxCategory::Erc20, TxCategory::Internal];

    /// Explorer `action` parameter for this category
    pub fn action(&self) -> &'static str {
        match self {
            TxCategory::Normal => "txlist",
            TxCategory::Erc20 => "tokentx",
            TxCategory::Internal => "txlistinternal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxCategory::Normal => "normal",
            TxCategory::Erc20 => "erc20",
            TxCategory::Internal => "internal",
        }
    }
}

impl std::fmt::Display for TxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a timestamp the resolved block must fall on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Closest {
    Before,
    After,
}

impl Closest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Closest::Before => "before",
            Closest::After => "after",
        }
    }
}

impl std::fmt::Display for Closest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive block window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub start_block: u64,
    pub end_block: u64,
}

impl BlockRange {
    pub fn new(start_block: u64, end_block: u64) -> Self {
        Self { start_block, end_block }
    }

    /// True when inward bounding left no block inside the window
    pub fn is_empty(&self) -> bool {
        self.start_block > self.end_block
    }
}

/// One request for a wallet's history over a date span
#[derive(Debug)]
pub struct PeriodQuery {
    pub address: String,
    pub start_date: String,
    pub end_date: String,
    pub network: String,
    pub api_key: Option<SecretString>,
}

impl PeriodQuery {
    pub fn new(
        address: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        network: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            address: address.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            network: network.into(),
            api_key: api_key.map(|key| SecretString::new(key.into_boxed_str())),
        }
    }
}

// =============================================================================
// Transaction Types
// =============================================================================

/// Explorer record passed through untouched apart from `tx_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(pub Map<String, Value>);

impl TransactionRecord {
    pub const TYPE_FIELD: &'static str = "tx_type";

    /// Wrap an upstream entry; anything but a JSON object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn tag(&mut self, category: TxCategory) {
        self.0.insert(
            Self::TYPE_FIELD.to_string(),
            Value::String(category.as_str().to_string()),
        );
    }

    pub fn tx_type(&self) -> Option<&str> {
        self.get(Self::TYPE_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Records of a period grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTransactions {
    pub normal: Vec<TransactionRecord>,
    pub erc20: Vec<TransactionRecord>,
    pub internal: Vec<TransactionRecord>,
}

impl PeriodTransactions {
    pub fn get(&self, category: TxCategory) -> &[TransactionRecord] {
        match category {
            TxCategory::Normal => &self.normal,
            TxCategory::Erc20 => &self.erc20,
            TxCategory::Internal => &self.internal,
        }
    }

    pub fn total(&self) -> usize {
        self.normal.len() + self.erc20.len() + self.internal.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_parsing() {
        assert_eq!("ethereum".parse::<Network>().unwrap(), Network::Ethereum);
        assert_eq!(" BSC ".parse::<Network>().unwrap(), Network::Bsc);

        let err = "polygon".parse::<Network>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.message.contains("polygon"));
    }

    #[test]
    fn test_network_urls() {
        assert!(Network::Ethereum.default_base_url().contains("etherscan.io"));
        assert!(Network::Bsc.default_base_url().contains("bscscan.com"));
    }

    #[test]
    fn test_category_actions() {
        assert_eq!(TxCategory::Normal.action(), "txlist");
        assert_eq!(TxCategory::Erc20.action(), "tokentx");
        assert_eq!(TxCategory::Internal.action(), "txlistinternal");
    }

    #[test]
    fn test_record_tagging_keeps_fields() {
        let mut record = TransactionRecord::from_value(json!({"hash": "0xabc", "value": "1"})).unwrap();
        record.tag(TxCategory::Erc20);

        assert_eq!(record.tx_type(), Some("erc20"));
        assert_eq!(record.get("hash"), Some(&json!("0xabc")));
        assert!(TransactionRecord::from_value(json!("0xabc")).is_none());
    }

    #[test]
    fn test_period_transactions_serialization() {
        let mut record = TransactionRecord::from_value(json!({"hash": "0x1"})).unwrap();
        record.tag(TxCategory::Normal);
        let period = PeriodTransactions {
            normal: vec![record],
            ..Default::default()
        };

        let value = serde_json::to_value(&period).unwrap();
        assert_eq!(value["normal"][0]["tx_type"], "normal");
        assert_eq!(value["erc20"], json!([]));
        assert_eq!(value["internal"], json!([]));
        assert_eq!(period.total(), 1);
    }

    #[test]
    fn test_block_range_empty() {
        assert!(!BlockRange::new(100, 200).is_empty());
        assert!(!BlockRange::new(100, 100).is_empty());
        assert!(BlockRange::new(201, 200).is_empty());
    }
}
