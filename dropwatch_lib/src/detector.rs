//! Price-drop evaluation over daily close series.
//!
//! This module is pure calculation on already-fetched history. Fetching
//! prices and sending messages belong to the cycle runner.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// One daily closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Lookback windows and the alert threshold for drop evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// Minimum percent drop from the recent peak that triggers an alert.
    pub drop_threshold_percent: f64,
    /// Calendar days scanned backwards from the latest close for the peak.
    pub peak_lookback_days: i64,
    /// Calendar days back to the reference close for the trend reading.
    pub trend_lookback_days: i64,
}

/// Direction of the latest close relative to the trend reference point.
///
/// Informational only; it never gates an alert. `Unknown` means the series
/// has no point at the exact reference date (weekend, holiday, or history
/// shorter than the trend lookback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
    Unknown,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
            Trend::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A triggered drop alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertResult {
    pub ticker: String,
    pub drop_percent: f64,
}

impl AlertResult {
    /// The message text pushed to the alert channel.
    pub fn message(&self) -> String {
        format!("{} dropped {:.2}%", self.ticker, self.drop_percent)
    }
}

/// Full outcome of evaluating one ticker's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub ticker: String,
    /// Date of the latest close; all lookbacks are anchored here.
    pub as_of: NaiveDate,
    pub close: f64,
    pub recent_peak: f64,
    pub drop_percent: f64,
    pub trend: Trend,
    pub triggered: bool,
}

impl Evaluation {
    /// The alert carried by this evaluation, if it triggered.
    pub fn alert(&self) -> Option<AlertResult> {
        self.triggered.then(|| AlertResult {
            ticker: self.ticker.clone(),
            drop_percent: self.drop_percent,
        })
    }
}

/// Returned when a ticker has no usable price history to evaluate.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("No usable price data for {ticker}")]
pub struct InsufficientDataError {
    pub ticker: String,
}

/// Evaluate one ticker's close series against the drop thresholds.
///
/// The series must be sorted ascending by date with one point per date; the
/// last point is treated as "today". Returns the full evaluation, with
/// `triggered` set when the drop from the recent peak meets the threshold
/// (boundary inclusive). A drop of zero or less never triggers.
///
/// Returns `InsufficientDataError` if the series is empty or contains no
/// positive close within the peak window.
pub fn evaluate(
    ticker: &str,
    series: &[PricePoint],
    params: &DetectorParams,
) -> Result<Evaluation, InsufficientDataError> {
    let latest = series.last().ok_or_else(|| InsufficientDataError {
        ticker: ticker.to_string(),
    })?;

    let recent_peak = peak_close(series, latest.date, params.peak_lookback_days);
    // Non-positive closes are normally filtered at fetch time; a window whose
    // peak still is not positive cannot be evaluated.
    if recent_peak <= 0.0 {
        return Err(InsufficientDataError {
            ticker: ticker.to_string(),
        });
    }

    let drop_percent = (recent_peak - latest.close) / recent_peak * 100.0;
    let triggered = drop_percent > 0.0 && drop_percent >= params.drop_threshold_percent;

    Ok(Evaluation {
        ticker: ticker.to_string(),
        as_of: latest.date,
        close: latest.close,
        recent_peak,
        drop_percent,
        trend: trend_at(series, latest, params.trend_lookback_days),
        triggered,
    })
}

/// Highest close within `lookback_days` calendar days of `as_of`, inclusive.
/// The latest point itself is always in the window, so the result is never
/// below the latest close.
fn peak_close(series: &[PricePoint], as_of: NaiveDate, lookback_days: i64) -> f64 {
    series
        .iter()
        .filter(|p| {
            let age = (as_of - p.date).num_days();
            (0..=lookback_days).contains(&age)
        })
        .map(|p| p.close)
        .fold(f64::MIN, f64::max)
}

/// Compare the latest close against the close exactly `lookback_days`
/// calendar days earlier. A missing reference date (or a lookback that
/// overflows the calendar) reads as `Unknown`.
fn trend_at(series: &[PricePoint], latest: &PricePoint, lookback_days: i64) -> Trend {
    let reference = chrono::Duration::try_days(lookback_days)
        .and_then(|delta| latest.date.checked_sub_signed(delta));
    let past = match reference {
        Some(date) => series.iter().find(|p| p.date == date),
        None => None,
    };
    match past {
        Some(past) if latest.close > past.close => Trend::Up,
        Some(past) if latest.close < past.close => Trend::Down,
        Some(_) => Trend::Flat,
        None => Trend::Unknown,
    }
}
