//! Unified error types for tx-fetcher
//!
//! Every failure in the fetch pipeline flows through [`FetchError`] so that
//! front ends (HTTP endpoint, command line) can map each kind of failure to
//! a status deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all fetch operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl FetchError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, msg)
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Upstream, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Parse, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }

    pub fn is_upstream(&self) -> bool {
        self.code == ErrorCode::Upstream
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for FetchError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Caller input rejected before or instead of an upstream call
    Validation,
    /// Explorer answered with a non-success status
    Upstream,
    /// Transport failure: connect, TLS, timeout
    Network,
    /// Body was not JSON or not the expected shape
    Parse,
    Internal,
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

// Conversions from common error types

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::new(ErrorCode::Parse, e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string
        let e = e.without_url();
        if e.is_timeout() {
            FetchError::new(ErrorCode::Network, "Request timed out")
        } else if e.is_connect() {
            FetchError::new(ErrorCode::Network, "Connection failed")
        } else if e.is_decode() {
            FetchError::new(ErrorCode::Parse, e.to_string())
        } else {
            FetchError::new(ErrorCode::Network, e.to_string())
        }
    }
}
