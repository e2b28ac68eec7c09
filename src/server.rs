//! HTTP endpoint for period transaction history
//!
//! `GET /api/transactions` in front of [`PeriodFetcher`]. The fetch itself is
//! blocking, so every request is moved onto tokio's blocking pool.

use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Instant;
use thiserror::Error;

use crate::error::{ErrorCode, FetchError};
use crate::explorer::PeriodFetcher;
use crate::types::{PeriodQuery, PeriodTransactions};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: PeriodFetcher,
}

impl AppState {
    pub fn new(fetcher: PeriodFetcher) -> Self {
        Self { fetcher }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameters")]
    MissingParameters,

    #[error("API key is required")]
    MissingApiKey,

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("{}", .0.message)]
    Fetch(#[from] FetchError),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameters | ApiError::MissingApiKey | ApiError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Fetch(e) => match e.code {
                ErrorCode::Validation => StatusCode::BAD_REQUEST,
                ErrorCode::Upstream | ErrorCode::Network | ErrorCode::Parse | ErrorCode::Internal => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            crate::log_error!("server", "Request failed", status = status.as_u16(), error = self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Query string of `/api/transactions`. `access_password` is tolerated and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsParams {
    pub wallet_address: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub network: Option<String>,
    pub api_key: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn get_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionsParams>, QueryRejection>,
) -> Result<Json<PeriodTransactions>, ApiError> {
    let Query(params) = query?;
    let (Some(address), Some(start_date), Some(end_date)) = (
        present(params.wallet_address),
        present(params.start_date),
        present(params.end_date),
    ) else {
        return Err(ApiError::MissingParameters);
    };
    let Some(api_key) = present(params.api_key) else {
        return Err(ApiError::MissingApiKey);
    };
    let network = present(params.network)
        .unwrap_or_else(|| "ethereum".to_string())
        .to_lowercase();

    let query = PeriodQuery::new(address, start_date, end_date, network, Some(api_key));
    let fetcher = state.fetcher.clone();

    let transactions = tokio::task::spawn_blocking(move || fetcher.get_transactions_for_period(&query))
        .await
        .map_err(|e| FetchError::internal(format!("Fetch task failed: {}", e)))??;

    Ok(Json(transactions))
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status and duration. The query string carries the
/// API key and is never logged.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    crate::log_info!("server", "api.request",
        method = method,
        path = path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis());

    response
}

// ============================================================================
// Server
// ============================================================================

/// Build the router (also used directly by tests)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/transactions", get(get_transactions))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    crate::log_info!("server", "Listening", addr = addr);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingParameters.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingApiKey.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidQuery("bad".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(FetchError::validation("Unsupported network")).status_code(),
            StatusCode::BAD_REQUEST
        );
        for err in [
            FetchError::upstream("Max rate limit reached"),
            FetchError::network("Connection failed"),
            FetchError::parse_error("JSON parse error"),
            FetchError::internal("Fetch task failed"),
        ] {
            assert_eq!(ApiError::from(err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_error_message_omits_code_prefix() {
        let err = ApiError::from(FetchError::upstream("Error fetching erc20 transactions: NOTOK"));
        assert_eq!(err.to_string(), "Error fetching erc20 transactions: NOTOK");
    }

    #[test]
    fn test_present_treats_empty_as_missing() {
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("bsc".to_string())), Some("bsc".to_string()));
        assert_eq!(present(None), None);
    }
}
