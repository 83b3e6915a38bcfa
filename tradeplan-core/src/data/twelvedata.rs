//! Twelve Data time-series provider.
//!
//! Fetches daily/weekly OHLCV bars from the Twelve Data REST API. The
//! API reports most errors in the response body with an HTTP 200, so
//! parsing inspects the embedded status/code fields as well as the HTTP
//! status. Bars arrive newest-first and are reversed before returning.
//!
//! Retry is NOT handled here. The engine wraps calls in a
//! `RetryPolicy`, so a provider fetch is a single attempt.

use std::time::Duration;

use serde::Deserialize;

use super::key_rotator::KeyRotator;
use super::normalize::{normalize, RawBarRecord};
use super::provider::{BarProvider, FetchError, Interval};
use crate::domain::PriceBar;

const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// Twelve Data time-series response. Error responses carry `status`,
/// `code`, and `message` instead of `values`.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    values: Option<Vec<RawBarRecord>>,
    status: Option<String>,
    code: Option<u32>,
    message: Option<String>,
}

pub struct TwelveDataProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    keys: KeyRotator,
}

impl TwelveDataProvider {
    pub fn new(keys: KeyRotator) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            keys,
        })
    }

    /// Point the provider at a different host. Used to target a local
    /// stub server in integration tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn series_url(&self, symbol: &str, interval: Interval, outputsize: usize) -> String {
        format!(
            "{}/time_series?symbol={symbol}&interval={}&outputsize={outputsize}&apikey={}",
            self.base_url,
            interval.as_query(),
            self.keys.next_key(),
        )
    }

    fn parse_response(symbol: &str, resp: TimeSeriesResponse) -> Result<Vec<PriceBar>, FetchError> {
        if resp.status.as_deref() == Some("error") {
            let message = resp.message.unwrap_or_else(|| "no message".to_string());
            return Err(match resp.code {
                Some(404) => FetchError::SymbolNotFound {
                    symbol: symbol.to_string(),
                },
                Some(429) => FetchError::RateLimited {
                    retry_after_secs: 60,
                },
                Some(code) => FetchError::Other(format!("provider error {code}: {message}")),
                None => FetchError::ResponseFormatChanged(message),
            });
        }

        let values = resp.values.ok_or_else(|| {
            FetchError::ResponseFormatChanged("no values and no error status".into())
        })?;

        if values.is_empty() {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        // Wire order is newest-first; callers expect oldest-first.
        let mut bars = normalize(&values)?;
        bars.reverse();
        Ok(bars)
    }
}

impl BarProvider for TwelveDataProvider {
    fn name(&self) -> &str {
        "twelve_data"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        outputsize: usize,
    ) -> Result<Vec<PriceBar>, FetchError> {
        let url = self.series_url(symbol, interval, outputsize);

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                FetchError::NetworkUnreachable(e.to_string())
            } else {
                FetchError::Other(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Other(format!("HTTP {status} for {symbol}")));
        }

        let series: TimeSeriesResponse = resp.json().map_err(|e| {
            FetchError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TimeSeriesResponse {
        serde_json::from_str(json).expect("test JSON should deserialize")
    }

    #[test]
    fn parses_and_reverses_values() {
        let resp = parse(
            r#"{
                "values": [
                    {"datetime": "2024-01-03", "open": "102", "high": "103", "low": "101", "close": "102.5", "volume": "900"},
                    {"datetime": "2024-01-02", "open": "100", "high": "101", "low": "99", "close": "100.5", "volume": "1000"}
                ],
                "status": "ok"
            }"#,
        );
        let bars = TwelveDataProvider::parse_response("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 2);
        // Oldest-first after the reverse.
        assert_eq!(bars[0].close, 100.5);
        assert_eq!(bars[1].close, 102.5);
    }

    #[test]
    fn error_404_maps_to_symbol_not_found() {
        let resp = parse(r#"{"status": "error", "code": 404, "message": "symbol not found"}"#);
        assert!(matches!(
            TwelveDataProvider::parse_response("NOPE", resp).unwrap_err(),
            FetchError::SymbolNotFound { .. }
        ));
    }

    #[test]
    fn error_429_maps_to_rate_limited() {
        let resp = parse(r#"{"status": "error", "code": 429, "message": "too many requests"}"#);
        assert!(matches!(
            TwelveDataProvider::parse_response("AAPL", resp).unwrap_err(),
            FetchError::RateLimited { .. }
        ));
    }

    #[test]
    fn missing_values_is_format_change() {
        let resp = parse(r#"{"status": "ok"}"#);
        assert!(matches!(
            TwelveDataProvider::parse_response("AAPL", resp).unwrap_err(),
            FetchError::ResponseFormatChanged(_)
        ));
    }

    #[test]
    fn empty_values_is_symbol_not_found() {
        let resp = parse(r#"{"values": [], "status": "ok"}"#);
        assert!(matches!(
            TwelveDataProvider::parse_response("GHOST", resp).unwrap_err(),
            FetchError::SymbolNotFound { .. }
        ));
    }
}
