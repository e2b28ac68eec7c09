//! Etherscan-style response envelope: `{status, message, result}`

use crate::error::{FetchError, FetchResult};
use serde::Deserialize;
use serde_json::Value;

/// Messages that mean "nothing in range" rather than failure
const EMPTY_RESULT_MESSAGES: [&str; 2] = ["no transactions found", "0"];

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerEnvelope {
    /// Kept raw: only the string `"1"` means success
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ExplorerEnvelope {
    pub fn from_value(body: Value) -> FetchResult<Self> {
        // serde would also accept a positional array for the struct
        if !body.is_object() {
            return Err(FetchError::parse_error("Explorer response is not a JSON object"));
        }

        serde_json::from_value(body)
            .map_err(|e| FetchError::parse_error(format!("Malformed explorer response: {}", e)))
    }

    pub fn is_success(&self) -> bool {
        self.status.as_str() == Some("1")
    }

    /// Failure status whose message only says the range holds no records
    pub fn is_empty_result(&self) -> bool {
        let message = self.message.to_lowercase();
        !self.is_success() && EMPTY_RESULT_MESSAGES.contains(&message.as_str())
    }

    /// Human-readable failure reason combining `message` and a textual `result`
    pub fn reason(&self) -> String {
        let message = self.message.trim();
        let detail = self.result.as_str().map(str::trim).filter(|s| !s.is_empty());

        match detail {
            Some(detail) if !message.is_empty() && detail != message => {
                format!("{}: {}", message, detail)
            }
            Some(detail) => detail.to_string(),
            None if !message.is_empty() => message.to_string(),
            None => "explorer reported failure without a message".to_string(),
        }
    }
}
