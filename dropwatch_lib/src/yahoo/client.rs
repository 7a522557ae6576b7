//! Yahoo Finance chart client for fetching historical daily closes.

use super::error::YahooError;
use super::types::ChartResponse;
use crate::detector::PricePoint;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use std::time::Duration;
use tracing::debug;

/// Request timeout for Yahoo Finance calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Yahoo answers 429 to clients that do not look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Yahoo Finance v8 chart client for daily close history.
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    /// Create a new YahooClient against the production endpoint.
    pub fn new() -> Result<Self, YahooError> {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    /// Create a new YahooClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str) -> Result<Self, YahooError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch daily closes for `symbol` between `start` and `end` (inclusive).
    ///
    /// Points come back sorted ascending by date, one per date, with null and
    /// non-positive closes dropped. An empty vec means Yahoo answered but had
    /// no usable sessions in the window.
    pub async fn get_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, YahooError> {
        let period1 = NaiveDateTime::from(start).and_utc().timestamp();
        // period2 is exclusive; bump past the end date so its session is kept.
        let period2 = NaiveDateTime::from(end.checked_add_days(Days::new(1)).unwrap_or(end))
            .and_utc()
            .timestamp();
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        // 404 = symbol unknown or delisted
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(YahooError::SymbolNotFound(symbol.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(YahooError::RateLimited);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            let snippet = if body.len() > 200 { &body[..200] } else { &body };
            return Err(YahooError::Status {
                status: status.as_u16(),
                body: snippet.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| {
            YahooError::ParseFailed(format!("Failed to read response body: {}", e))
        })?;

        let parsed: ChartResponse = serde_json::from_str(&body).map_err(|e| {
            let snippet = if body.len() > 500 { &body[..500] } else { &body };
            YahooError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e, snippet
            ))
        })?;

        if let Some(err) = parsed.chart.error {
            if err.code.eq_ignore_ascii_case("not found") {
                return Err(YahooError::SymbolNotFound(symbol.to_string()));
            }
            return Err(YahooError::Api {
                code: err.code,
                description: err.description,
            });
        }

        let result = parsed
            .chart
            .result
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| YahooError::NoData(symbol.to_string()))?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| YahooError::NoData(symbol.to_string()))?;

        let offset = result.meta.gmtoffset;
        let mut points: Vec<PricePoint> = result
            .timestamp
            .iter()
            .zip(quote.close.iter())
            .filter_map(|(&ts, &close)| {
                let close = close?;
                if close <= 0.0 {
                    return None;
                }
                // Shift by the exchange offset so the date is the local trading day.
                let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
                Some(PricePoint { date, close })
            })
            .collect();

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);

        debug!(symbol = %symbol, points = points.len(), "fetched daily history");

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Sessions for 2024-06-13 and 2024-06-14, NYSE open (13:30 UTC, EDT).
    fn sample_chart_json() -> serde_json::Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {
                        "currency": "USD",
                        "symbol": "AAPL",
                        "exchangeName": "NMS",
                        "instrumentType": "EQUITY",
                        "gmtoffset": -14400,
                        "timezone": "EDT",
                        "regularMarketPrice": 90.0
                    },
                    "timestamp": [1718285400, 1718371800],
                    "indicators": {
                        "quote": [{
                            "open": [93.5, 92.8],
                            "high": [94.2, 93.0],
                            "low": [92.7, 89.6],
                            "close": [93.1, 90.0],
                            "volume": [51230000, 63410000]
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[tokio::test]
    async fn success_parses_daily_closes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_chart_json()))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let points = client
            .get_daily_history("AAPL", june(1), june(14))
            .await
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, june(13));
        assert_eq!(points[0].close, 93.1);
        assert_eq!(points[1].date, june(14));
        assert_eq!(points[1].close, 90.0);
    }

    #[tokio::test]
    async fn sends_period_and_interval_query_params() {
        let server = MockServer::start().await;

        // 2024-06-01 and 2024-06-15 at UTC midnight.
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .and(query_param("period1", "1717200000"))
            .and(query_param("period2", "1718409600"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_chart_json()))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let result = client.get_daily_history("AAPL", june(1), june(14)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn null_and_nonpositive_closes_are_dropped() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL", "gmtoffset": -14400 },
                    "timestamp": [1718112600, 1718285400, 1718371800],
                    "indicators": {
                        "quote": [{ "close": [null, 0.0, 90.0] }]
                    }
                }],
                "error": null
            }
        });

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let points = client
            .get_daily_history("AAPL", june(1), june(14))
            .await
            .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, june(14));
        assert_eq!(points[0].close, 90.0);
    }

    #[tokio::test]
    async fn gmtoffset_shifts_to_the_local_trading_day() {
        let server = MockServer::start().await;

        // 2024-06-14 22:00 UTC with a +10h offset lands on June 15 locally.
        let body = serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "BHP.AX", "gmtoffset": 36000 },
                    "timestamp": [1718402400],
                    "indicators": {
                        "quote": [{ "close": [45.2] }]
                    }
                }],
                "error": null
            }
        });

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/BHP.AX"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let points = client
            .get_daily_history("BHP.AX", june(1), june(16))
            .await
            .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, june(15));
    }

    #[tokio::test]
    async fn empty_sessions_return_empty_vec() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "EMPT", "gmtoffset": -14400 },
                    "timestamp": [],
                    "indicators": { "quote": [{ "close": [] }] }
                }],
                "error": null
            }
        });

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/EMPT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let points = client
            .get_daily_history("EMPT", june(1), june(14))
            .await
            .unwrap();

        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn not_found_maps_to_symbol_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/FAKETICKER"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let result = client.get_daily_history("FAKETICKER", june(1), june(14)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, YahooError::SymbolNotFound(_)));
        assert!(err.to_string().contains("FAKETICKER"));
    }

    #[tokio::test]
    async fn envelope_not_found_maps_to_symbol_not_found() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        });

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/GONE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let result = client.get_daily_history("GONE", june(1), june(14)).await;

        assert!(matches!(result.unwrap_err(), YahooError::SymbolNotFound(_)));
    }

    #[tokio::test]
    async fn envelope_error_maps_to_api_error() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Bad Request",
                    "description": "Invalid input - interval=1x is not supported"
                }
            }
        });

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let err = client
            .get_daily_history("AAPL", june(1), june(14))
            .await
            .unwrap_err();

        match err {
            YahooError::Api { code, description } => {
                assert_eq!(code, "Bad Request");
                assert!(description.contains("interval"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rate_limit_maps_to_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let result = client.get_daily_history("AAPL", june(1), june(14)).await;

        assert!(matches!(result.unwrap_err(), YahooError::RateLimited));
    }

    #[tokio::test]
    async fn server_error_includes_status_and_body_snippet() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let err = client
            .get_daily_history("AAPL", june(1), june(14))
            .await
            .unwrap_err();

        match err {
            YahooError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("Internal Server Error"));
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_parse_failed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
            .mount(&server)
            .await;

        let client = YahooClient::with_base_url(&server.uri()).unwrap();
        let result = client.get_daily_history("AAPL", june(1), june(14)).await;

        assert!(matches!(result.unwrap_err(), YahooError::ParseFailed(_)));
    }

    #[test]
    fn client_creation_with_defaults() {
        assert!(YahooClient::new().is_ok());
    }

    #[test]
    fn client_creation_with_base_url() {
        assert!(YahooClient::with_base_url("http://localhost:1234").is_ok());
    }
}
