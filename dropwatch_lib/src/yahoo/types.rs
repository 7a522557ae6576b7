//! Response types for the Yahoo Finance v8 chart API.

use serde::Deserialize;

/// Top-level envelope: `{ "chart": { "result": [...], "error": null } }`.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Error object Yahoo embeds in the envelope, e.g. code "Not Found" for
/// unknown or delisted symbols.
#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Unix timestamps of the sessions, aligned with the quote arrays.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

/// We only use `gmtoffset` (exchange UTC offset in seconds) so timestamps
/// resolve to the exchange's trading day rather than the UTC day.
#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Close series aligned with `timestamp`; nulls mark sessions without a
/// usable close.
#[derive(Debug, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
