//! Yahoo Finance chart API client for fetching historical daily closes.
//!
//! The v8 chart endpoint is unauthenticated but rejects requests that do not
//! carry a browser-like user agent. This is the only price source; tickers
//! Yahoo cannot resolve are skipped for the cycle.

pub mod client;
pub mod error;
pub mod types;

pub use client::YahooClient;
pub use error::YahooError;
