//! JSON Parsing Utilities
//!
//! Safe JSON parsing with proper error handling.

use crate::error::{FetchError, FetchResult};

/// Safely parse JSON value from response body
pub fn parse_json_value(json_str: &str) -> FetchResult<serde_json::Value> {
    serde_json::from_str(json_str)
        .map_err(|e| FetchError::parse_error(format!("JSON parse error: {}", e)))
}

/// Read a u64 from a JSON value (handles number, decimal string and hex string)
pub fn value_as_u64(value: &serde_json::Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        Some(n)
    } else if let Some(s) = value.as_str() {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            u64::from_str_radix(&s[2..], 16).ok()
        } else {
            s.parse().ok()
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_u64() {
        assert_eq!(value_as_u64(&json!(42)), Some(42));
        assert_eq!(value_as_u64(&json!("0x2A")), Some(42));
        assert_eq!(value_as_u64(&json!("42")), Some(42));
        assert_eq!(value_as_u64(&json!("Error! No closest block found")), None);
        assert_eq!(value_as_u64(&json!(null)), None);
        assert_eq!(value_as_u64(&json!(-1)), None);
    }

    #[test]
    fn test_parse_json_value_rejects_html() {
        let err = parse_json_value("<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Parse);
    }
}
