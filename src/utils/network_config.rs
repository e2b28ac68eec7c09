//! Explorer Endpoint Validation
//!
//! Validates configured explorer base URLs with:
//! - URL format validation
//! - TLS requirement enforcement (local hosts excepted)
//! - Known explorer domain check
//! - Credential and API-key leakage checks

use url::Url;

/// Explorer domains shipped as defaults
const KNOWN_EXPLORERS: [&str; 2] = ["etherscan.io", "bscscan.com"];

/// Validation result for an explorer endpoint
#[derive(Debug, Clone)]
pub struct EndpointValidation {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Validate an explorer base URL
pub fn validate_explorer_url(url: &str) -> EndpointValidation {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            errors.push(format!("Invalid URL format: {}", e));
            return EndpointValidation {
                is_valid: false,
                warnings,
                errors,
            };
        }
    };

    match parsed.scheme() {
        "https" => {}
        "http" => {
            // Plain HTTP only for local explorers and test doubles
            if parsed.host_str().map(is_local_host).unwrap_or(false) {
                warnings.push("HTTP allowed for local development only".to_string());
            } else {
                errors.push("HTTPS required for remote endpoints".to_string());
            }
        }
        other => errors.push(format!("Unsupported URL scheme: {}", other)),
    }

    match parsed.host_str() {
        Some(host) => {
            if !is_local_host(host) && !is_known_explorer(host) {
                warnings.push(format!(
                    "Domain '{}' is not a known explorer. Ensure it speaks the Etherscan API.",
                    host
                ));
            }
        }
        None => errors.push("URL has no host".to_string()),
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        errors.push("Credentials in URL are not allowed".to_string());
    }

    if let Some(query) = parsed.query() {
        let query = query.to_lowercase();
        if query.contains("apikey") || query.contains("api_key") {
            errors.push("API key must be supplied per request, not in the base URL".to_string());
        }
    }

    EndpointValidation {
        is_valid: errors.is_empty(),
        warnings,
        errors,
    }
}

fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1")
}

/// Check if a host belongs to a known explorer (subdomains included)
pub fn is_known_explorer(host: &str) -> bool {
    KNOWN_EXPLORERS
        .iter()
        .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
}
