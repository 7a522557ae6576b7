//! Library layer for Dropwatch: price-drop detection over daily closes.
//!
//! Fetches daily history from the Yahoo Finance chart API, evaluates each
//! ticker against a configured drop threshold, and pushes alerts to a
//! Telegram chat. One call to [`run_cycle`] is one scheduler tick.

pub mod config;
pub mod detector;
pub mod runner;
pub mod telegram;
pub mod yahoo;

pub use config::{Config, ConfigError, TelegramConfig};
pub use detector::{
    evaluate, AlertResult, DetectorParams, Evaluation, InsufficientDataError, PricePoint, Trend,
};
pub use runner::{
    evaluate_tickers, run_cycle, CycleReport, DispatchFailure, ProbeStatus, TickerSkip,
};
pub use telegram::{TelegramClient, TelegramError};
pub use yahoo::{YahooClient, YahooError};
