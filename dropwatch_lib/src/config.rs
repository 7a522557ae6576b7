//! Run configuration: tickers to watch, lookback windows, and the Telegram
//! destination.
//!
//! Configuration lives in a JSON file. The bot token may be left blank in the
//! file and supplied through the `DROPWATCH_TELEGRAM_TOKEN` environment
//! variable instead; resolving that override is the caller's job.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::detector::DetectorParams;

/// Environment variable that overrides `telegram.bot_token` from the file.
pub const TELEGRAM_TOKEN_ENV: &str = "DROPWATCH_TELEGRAM_TOKEN";

const DEFAULT_PROBE_SYMBOL: &str = "SPY";

/// Error types for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Telegram destination for alert messages.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token. May be blank in the file when the env override is used.
    #[serde(default)]
    pub bot_token: String,
    /// Target chat id, as Telegram reports it (numeric id in string form).
    pub chat_id: String,
}

/// Full run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tickers: Vec<String>,
    pub drop_threshold_percent: f64,
    pub peak_lookback_days: i64,
    pub trend_lookback_days: i64,
    /// Symbol fetched on quiet cycles to confirm the data source is alive.
    #[serde(default = "default_probe_symbol")]
    pub probe_symbol: String,
    pub telegram: TelegramConfig,
}

fn default_probe_symbol() -> String {
    DEFAULT_PROBE_SYMBOL.to_string()
}

impl Config {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(raw)?;
        config.tickers = normalize_tickers(&config.tickers)?;
        config.probe_symbol = config.probe_symbol.trim().to_uppercase();
        config.validate()?;
        Ok(config)
    }

    /// Detector parameters derived from this config.
    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            drop_threshold_percent: self.drop_threshold_percent,
            peak_lookback_days: self.peak_lookback_days,
            trend_lookback_days: self.trend_lookback_days,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("tickers must not be empty".into()));
        }
        if !(self.drop_threshold_percent > 0.0) || !self.drop_threshold_percent.is_finite() {
            return Err(ConfigError::Invalid(
                "drop_threshold_percent must be a positive number".into(),
            ));
        }
        if self.peak_lookback_days < 1 || self.trend_lookback_days < 1 {
            return Err(ConfigError::Invalid(
                "peak_lookback_days and trend_lookback_days must be at least 1".into(),
            ));
        }
        if self.peak_lookback_days < self.trend_lookback_days {
            return Err(ConfigError::Invalid(
                "peak_lookback_days must be at least trend_lookback_days".into(),
            ));
        }
        if self.probe_symbol.is_empty() {
            return Err(ConfigError::Invalid("probe_symbol must not be blank".into()));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "telegram.chat_id must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Trim and uppercase ticker symbols, rejecting blanks and duplicates.
pub fn normalize_tickers(tickers: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(tickers.len());

    for ticker in tickers {
        let symbol = ticker.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ConfigError::Invalid(
                "tickers must not contain blank entries".into(),
            ));
        }
        if !seen.insert(symbol.clone()) {
            return Err(ConfigError::Invalid(format!("duplicate ticker: {}", symbol)));
        }
        normalized.push(symbol);
    }

    Ok(normalized)
}
