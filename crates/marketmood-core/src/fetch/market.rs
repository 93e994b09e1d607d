//! Benchmark index and volatility fetcher (Yahoo Finance chart API).
//!
//! Pulls five days of daily closes for the Nifty 50 and India VIX so at
//! least two sessions exist even on Mondays and early mornings, then
//! derives day-over-day percentage change from the last two closes.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{FetchError, BROWSER_USER_AGENT, DEFAULT_TIMEOUT_MS};
use crate::domain::MarketSnapshot;
use crate::http_client::{HttpClient, HttpRequest};

const INDEX_SYMBOL: &str = "^NSEI";
const VOLATILITY_SYMBOL: &str = "^INDIAVIX";

/// Fetches Nifty 50 and India VIX price action.
pub struct MarketDataFetcher {
    http: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl MarketDataFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Fetch the current snapshot. Failures are folded into the record.
    pub async fn fetch(&self) -> MarketSnapshot {
        match self.try_fetch().await {
            Ok(snapshot) => {
                debug!(data = ?snapshot.data, "market data fetched");
                snapshot
            }
            Err(error) => {
                warn!(code = error.code(), "market data fetch failed: {error}");
                MarketSnapshot::failed(error.to_string())
            }
        }
    }

    async fn try_fetch(&self) -> Result<MarketSnapshot, FetchError> {
        let (index_closes, volatility_closes) = tokio::join!(
            self.fetch_closes(INDEX_SYMBOL),
            self.fetch_closes(VOLATILITY_SYMBOL),
        );
        let index_closes = index_closes?;
        let volatility_closes = volatility_closes?;

        if index_closes.len() < 2 || volatility_closes.len() < 2 {
            return Err(FetchError::upstream(format!(
                "insufficient history: {INDEX_SYMBOL}({}), {VOLATILITY_SYMBOL}({})",
                index_closes.len(),
                volatility_closes.len()
            )));
        }

        let (index_prev, index_curr) = last_two(&index_closes);
        let (vol_prev, vol_curr) = last_two(&volatility_closes);

        let index_change = pct_change(index_prev, index_curr).ok_or_else(|| {
            FetchError::parse(format!("{INDEX_SYMBOL} previous close is zero"))
        })?;
        let vol_change = pct_change(vol_prev, vol_curr).ok_or_else(|| {
            FetchError::parse(format!("{VOLATILITY_SYMBOL} previous close is zero"))
        })?;

        Ok(MarketSnapshot::observed(
            index_curr,
            index_change,
            vol_curr,
            vol_change,
        ))
    }

    async fn fetch_closes(&self, symbol: &str) -> Result<Vec<f64>, FetchError> {
        let endpoint = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=5d&interval=1d",
            urlencoding::encode(symbol)
        );

        let request = HttpRequest::get(endpoint)
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http.execute(request).await.map_err(|e| {
            FetchError::transport(format!("chart transport error for {symbol}: {e}"))
        })?;

        if !response.is_success() {
            return Err(FetchError::upstream(format!(
                "chart endpoint for {symbol} returned status {}",
                response.status
            )));
        }

        parse_chart_closes(&response.body, symbol)
    }
}

fn last_two(closes: &[f64]) -> (f64, f64) {
    (closes[closes.len() - 2], closes[closes.len() - 1])
}

fn pct_change(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    Some((curr - prev) / prev * 100.0)
}

// ============================================================================
// Chart response schema
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Pull the non-null closes out of a chart response.
fn parse_chart_closes(body: &str, symbol: &str) -> Result<Vec<f64>, FetchError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("failed to parse chart for {symbol}: {e}")))?;

    if let Some(error) = response.chart.error {
        return Err(FetchError::upstream(format!(
            "chart API error for {symbol}: {} ({})",
            error.description.as_deref().unwrap_or("unknown"),
            error.code.as_deref().unwrap_or("unknown"),
        )));
    }

    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::parse(format!("no chart data for {symbol}")))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::parse(format!("no quote data for {symbol}")))?;

    Ok(quote.close.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;

    fn chart_body(closes: &[Option<f64>]) -> String {
        let closes = closes
            .iter()
            .map(|c| c.map_or(String::from("null"), |v| v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"{{"chart":{{"result":[{{"meta":{{}},"timestamp":[1,2,3],"indicators":{{"quote":[{{"close":[{closes}]}}]}}}}],"error":null}}}}"#
        )
    }

    #[tokio::test]
    async fn derives_change_from_last_two_closes() {
        let client = StaticHttpClient::new()
            .with_body(
                "chart/%5ENSEI",
                chart_body(&[Some(24_000.0), Some(24_200.0), Some(24_684.0)]),
            )
            .with_body(
                "chart/%5EINDIAVIX",
                chart_body(&[Some(14.0), Some(12.5), Some(13.0)]),
            );
        let fetcher = MarketDataFetcher::new(Arc::new(client));

        let snapshot = fetcher.fetch().await;
        let data = snapshot.data.expect("snapshot should carry data");

        assert_eq!(data.index_price, 24_684.0);
        assert_eq!(data.index_change_pct, 2.0);
        assert_eq!(data.volatility_price, 13.0);
        assert_eq!(data.volatility_change_pct, 4.0);
    }

    #[tokio::test]
    async fn null_closes_are_skipped_before_the_window_is_taken() {
        let client = StaticHttpClient::new()
            .with_body(
                "chart/%5ENSEI",
                chart_body(&[Some(24_000.0), None, Some(24_480.0)]),
            )
            .with_body("chart/%5EINDIAVIX", chart_body(&[Some(10.0), Some(11.0), None]));
        let fetcher = MarketDataFetcher::new(Arc::new(client));

        let snapshot = fetcher.fetch().await;
        let data = snapshot.data.expect("snapshot should carry data");

        assert_eq!(data.index_change_pct, 2.0);
        assert_eq!(data.volatility_change_pct, 10.0);
    }

    #[tokio::test]
    async fn insufficient_history_names_both_symbols() {
        let client = StaticHttpClient::new()
            .with_body("chart/%5ENSEI", chart_body(&[Some(24_000.0)]))
            .with_body("chart/%5EINDIAVIX", chart_body(&[Some(12.0), Some(13.0)]));
        let fetcher = MarketDataFetcher::new(Arc::new(client));

        let snapshot = fetcher.fetch().await;
        assert!(snapshot.data.is_none());
        let error = snapshot.error.expect("error is recorded");
        assert!(error.contains("insufficient history"));
        assert!(error.contains("^NSEI(1)"));
        assert!(error.contains("^INDIAVIX(2)"));
    }

    #[tokio::test]
    async fn chart_api_error_payload_is_surfaced() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let client = StaticHttpClient::new()
            .with_body("chart/%5ENSEI", body)
            .with_body("chart/%5EINDIAVIX", body);
        let fetcher = MarketDataFetcher::new(Arc::new(client));

        let snapshot = fetcher.fetch().await;
        let error = snapshot.error.expect("error is recorded");
        assert!(error.contains("No data found"));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_parse_failure() {
        let client = StaticHttpClient::new()
            .with_body("chart/%5ENSEI", "<html>blocked</html>")
            .with_body("chart/%5EINDIAVIX", chart_body(&[Some(12.0), Some(13.0)]));
        let fetcher = MarketDataFetcher::new(Arc::new(client));

        let snapshot = fetcher.fetch().await;
        assert!(snapshot.error.expect("error is recorded").contains("parse"));
    }
}
