//! Error types for Yahoo Finance chart operations.

use thiserror::Error;

/// Errors from Yahoo Finance chart operations.
#[derive(Error, Debug)]
pub enum YahooError {
    #[error("Symbol not found on Yahoo Finance: {0}")]
    SymbolNotFound(String),
    #[error("Rate limited by Yahoo Finance (HTTP 429)")]
    RateLimited,
    #[error("Yahoo Finance error {code}: {description}")]
    Api { code: String, description: String },
    #[error("Yahoo Finance returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
    #[error("No chart data returned for {0}")]
    NoData(String),
    #[error("Network error")]
    Network(#[from] reqwest::Error),
}
