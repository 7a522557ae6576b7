//! One evaluation cycle: fetch, evaluate, and dispatch alerts per ticker.
//!
//! Tickers are processed sequentially in config order. A failure on one
//! ticker (fetch error, unusable history, rejected dispatch) is logged and
//! recorded in the report; it never stops the cycle. Scheduling is external:
//! the process runs one cycle and exits.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::detector::{self, AlertResult, DetectorParams, Evaluation};
use crate::telegram::TelegramClient;
use crate::yahoo::YahooClient;

/// Extra days fetched beyond the lookback so the peak window stays fully
/// covered when the latest close is a few days old (weekend, holiday).
const FETCH_PAD_DAYS: u64 = 7;

/// Calendar days of history requested by the quiet-cycle probe.
const PROBE_LOOKBACK_DAYS: u64 = 7;

/// A ticker that could not be evaluated this cycle.
#[derive(Debug, Clone, Serialize)]
pub struct TickerSkip {
    pub ticker: String,
    pub reason: String,
}

/// A triggered alert whose message did not reach the chat.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchFailure {
    pub ticker: String,
    pub error: String,
}

/// Outcome of the quiet-cycle data source probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// At least one alert triggered, so no probe was needed.
    NotRun,
    Ok,
    Failed(String),
}

/// Everything that happened in one cycle.
#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub evaluations: Vec<Evaluation>,
    pub skipped: Vec<TickerSkip>,
    pub alerts: Vec<AlertResult>,
    pub dispatched: usize,
    pub dispatch_failures: Vec<DispatchFailure>,
    pub probe: ProbeStatus,
}

impl CycleReport {
    /// True when every triggered alert reached the chat and the data source
    /// looked healthy. Skipped tickers alone do not make a cycle unclean.
    pub fn is_clean(&self) -> bool {
        self.dispatch_failures.is_empty() && !matches!(self.probe, ProbeStatus::Failed(_))
    }
}

/// Fetch and evaluate every ticker, recording skips instead of failing.
pub async fn evaluate_tickers(
    yahoo: &YahooClient,
    tickers: &[String],
    params: &DetectorParams,
) -> (Vec<Evaluation>, Vec<TickerSkip>) {
    let (start, end) = fetch_window(params);
    let mut evaluations = Vec::with_capacity(tickers.len());
    let mut skipped = Vec::new();

    for ticker in tickers {
        match evaluate_one(yahoo, ticker, start, end, params).await {
            Ok(evaluation) => evaluations.push(evaluation),
            Err(skip) => skipped.push(skip),
        }
    }

    (evaluations, skipped)
}

/// Run one full cycle: evaluate every configured ticker and push a Telegram
/// message for each triggered drop.
///
/// With `telegram` set to `None` (dry run) alerts are still computed and the
/// quiet-cycle probe still fetches, but nothing is sent.
pub async fn run_cycle(
    config: &Config,
    yahoo: &YahooClient,
    telegram: Option<&TelegramClient>,
) -> CycleReport {
    let params = config.detector_params();
    let (start, end) = fetch_window(&params);

    info!(tickers = config.tickers.len(), "starting evaluation cycle");

    let mut evaluations = Vec::with_capacity(config.tickers.len());
    let mut skipped = Vec::new();
    let mut alerts = Vec::new();
    let mut dispatched = 0usize;
    let mut dispatch_failures = Vec::new();

    for ticker in &config.tickers {
        let evaluation = match evaluate_one(yahoo, ticker, start, end, &params).await {
            Ok(evaluation) => evaluation,
            Err(skip) => {
                skipped.push(skip);
                continue;
            }
        };

        if let Some(alert) = evaluation.alert() {
            info!(
                ticker = %alert.ticker,
                drop_percent = alert.drop_percent,
                "drop threshold crossed"
            );
            match telegram {
                Some(client) => match client.send_message(&alert.message()).await {
                    Ok(()) => dispatched += 1,
                    Err(err) => {
                        warn!(ticker = %alert.ticker, error = %err, "alert dispatch failed");
                        dispatch_failures.push(DispatchFailure {
                            ticker: alert.ticker.clone(),
                            error: err.to_string(),
                        });
                    }
                },
                None => debug!(ticker = %alert.ticker, "dry run, alert not sent"),
            }
            alerts.push(alert);
        }

        evaluations.push(evaluation);
    }

    let probe = if alerts.is_empty() {
        probe_data_source(&config.probe_symbol, yahoo, telegram).await
    } else {
        ProbeStatus::NotRun
    };

    info!(
        evaluated = evaluations.len(),
        skipped = skipped.len(),
        alerts = alerts.len(),
        dispatched = dispatched,
        "cycle finished"
    );

    CycleReport {
        evaluations,
        skipped,
        alerts,
        dispatched,
        dispatch_failures,
        probe,
    }
}

/// Fetch one ticker's history and evaluate it, mapping either failure mode
/// to a skip record.
async fn evaluate_one(
    yahoo: &YahooClient,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    params: &DetectorParams,
) -> Result<Evaluation, TickerSkip> {
    let series = match yahoo.get_daily_history(ticker, start, end).await {
        Ok(series) => series,
        Err(err) => {
            warn!(ticker = %ticker, error = %err, "price fetch failed, skipping");
            return Err(TickerSkip {
                ticker: ticker.to_string(),
                reason: err.to_string(),
            });
        }
    };

    match detector::evaluate(ticker, &series, params) {
        Ok(evaluation) => {
            debug!(
                ticker = %ticker,
                close = evaluation.close,
                peak = evaluation.recent_peak,
                drop_percent = evaluation.drop_percent,
                trend = %evaluation.trend,
                "evaluated"
            );
            Ok(evaluation)
        }
        Err(err) => {
            warn!(ticker = %ticker, "no usable price history, skipping");
            Err(TickerSkip {
                ticker: ticker.to_string(),
                reason: err.to_string(),
            })
        }
    }
}

/// Quiet cycles still touch the data source once, so an outage cannot hide
/// behind "no alerts today". A failed probe is reported to the chat.
async fn probe_data_source(
    symbol: &str,
    yahoo: &YahooClient,
    telegram: Option<&TelegramClient>,
) -> ProbeStatus {
    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_days(Days::new(PROBE_LOOKBACK_DAYS))
        .unwrap_or(end);

    let failure = match yahoo.get_daily_history(symbol, start, end).await {
        Ok(series) if !series.is_empty() => {
            debug!(symbol = %symbol, sessions = series.len(), "data source probe ok");
            return ProbeStatus::Ok;
        }
        Ok(_) => format!("no recent sessions returned for {}", symbol),
        Err(err) => err.to_string(),
    };

    warn!(symbol = %symbol, error = %failure, "data source probe failed");

    if let Some(client) = telegram {
        let notice = format!("Failed to reach Yahoo Finance API. Error: {}", failure);
        if let Err(err) = client.send_message(&notice).await {
            warn!(error = %err, "failed to send probe failure notice");
        }
    }

    ProbeStatus::Failed(failure)
}

/// Window of history to request: the longer lookback plus padding, ending
/// today (wall clock).
fn fetch_window(params: &DetectorParams) -> (NaiveDate, NaiveDate) {
    let end = Utc::now().date_naive();
    let lookback = params
        .peak_lookback_days
        .max(params.trend_lookback_days)
        .max(0) as u64
        + FETCH_PAD_DAYS;
    let start = end.checked_sub_days(Days::new(lookback)).unwrap_or(end);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> CycleReport {
        CycleReport {
            evaluations: Vec::new(),
            skipped: Vec::new(),
            alerts: Vec::new(),
            dispatched: 0,
            dispatch_failures: Vec::new(),
            probe: ProbeStatus::NotRun,
        }
    }

    #[test]
    fn test_fetch_window_spans_lookback_plus_pad() {
        let params = DetectorParams {
            drop_threshold_percent: 5.0,
            peak_lookback_days: 14,
            trend_lookback_days: 7,
        };
        let (start, end) = fetch_window(&params);
        assert_eq!((end - start).num_days(), 14 + FETCH_PAD_DAYS as i64);
    }

    #[test]
    fn test_fetch_window_uses_longer_lookback() {
        let params = DetectorParams {
            drop_threshold_percent: 5.0,
            peak_lookback_days: 3,
            trend_lookback_days: 10,
        };
        let (start, end) = fetch_window(&params);
        assert_eq!((end - start).num_days(), 10 + FETCH_PAD_DAYS as i64);
    }

    #[test]
    fn test_clean_report() {
        let report = empty_report();
        assert!(report.is_clean());
    }

    #[test]
    fn test_dispatch_failure_makes_report_unclean() {
        let mut report = empty_report();
        report.dispatch_failures.push(DispatchFailure {
            ticker: "AAPL".to_string(),
            error: "chat not found".to_string(),
        });
        assert!(!report.is_clean());
    }

    #[test]
    fn test_probe_failure_makes_report_unclean() {
        let mut report = empty_report();
        report.probe = ProbeStatus::Failed("timeout".to_string());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_skips_do_not_make_report_unclean() {
        let mut report = empty_report();
        report.skipped.push(TickerSkip {
            ticker: "EMPT".to_string(),
            reason: "No usable price data for EMPT".to_string(),
        });
        report.probe = ProbeStatus::Ok;
        assert!(report.is_clean());
    }
}
