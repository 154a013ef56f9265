// =============================================================================
// Yahoo Finance chart client — daily OHLCV history
// =============================================================================
//
// GET /v8/finance/chart/{symbol}?range=1y&interval=1d
//
// The chart endpoint returns parallel arrays (timestamp + quote columns) with
// nulls on non-trading days. Bars with every OHLC field null are skipped;
// a null volume counts as zero.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::series::{Bar, PriceSeries};

/// Source of daily price history for one instrument.
pub trait BarProvider: Send + Sync {
    fn fetch_daily(&self, symbol: &str) -> impl Future<Output = Result<PriceSeries>> + Send;
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Async Yahoo Finance chart client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    range: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client requesting `range` of daily history (e.g. `"1y"`).
    pub fn new(range: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            range: range.into(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, self.range
        )
    }

    /// GET the chart for `symbol` and parse it into a canonical series.
    #[instrument(skip(self), name = "yahoo::get_chart")]
    pub async fn get_chart(&self, symbol: &str) -> Result<PriceSeries> {
        let url = self.chart_url(symbol);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart body for {symbol}"))?;

        if !status.is_success() {
            anyhow::bail!("Yahoo chart for {} returned {}: {}", symbol, status, body);
        }

        let series = parse_chart(symbol, &body)?;
        if series.is_empty() {
            warn!(symbol, "chart response carried no usable bars");
        } else {
            debug!(symbol, count = series.len(), "daily bars fetched");
        }
        Ok(series)
    }
}

impl BarProvider for YahooClient {
    fn fetch_daily(&self, symbol: &str) -> impl Future<Output = Result<PriceSeries>> + Send {
        self.get_chart(symbol)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a chart API JSON body into a [`PriceSeries`].
///
/// An error payload from Yahoo becomes an `Err`; a well-formed response with
/// no usable bars becomes an empty series.
pub fn parse_chart(symbol: &str, body: &str) -> Result<PriceSeries> {
    let resp: ChartResponse = serde_json::from_str(body)
        .with_context(|| format!("failed to parse chart response for {symbol}"))?;

    if let Some(err) = resp.chart.error {
        anyhow::bail!("Yahoo chart error for {}: {} ({})", symbol, err.description, err.code);
    }

    let data = match resp.chart.result.and_then(|r| r.into_iter().next()) {
        Some(data) => data,
        None => return Ok(PriceSeries::new(symbol, Vec::new())),
    };

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .context("chart response has no quote columns")?;

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);

        let (open, high, low, close) = match (open, high, low, close) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let date = match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt.date_naive(),
            None => {
                warn!(symbol, ts, "skipping bar with invalid timestamp");
                continue;
            }
        };

        bars.push(Bar::new(date, open, high, low, close, volume));
    }

    if skipped > 0 {
        debug!(symbol, skipped, "skipped bars with missing OHLC");
    }

    Ok(PriceSeries::new(symbol, bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    const JAN_1_2024: i64 = 1_704_067_200;

    #[test]
    fn parses_quote_columns() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{},{}],
            "indicators":{{"quote":[{{"open":[1.0,2.0],"high":[1.5,2.5],
            "low":[0.5,1.5],"close":[1.2,2.2],"volume":[100,null]}}]}}}}],"error":null}}}}"#,
            JAN_1_2024,
            JAN_1_2024 + DAY
        );
        let series = parse_chart("BTC-USD", &body).unwrap();
        assert_eq!(series.len(), 2);
        let last = series.latest().unwrap();
        assert_eq!(last.close, 2.2);
        assert_eq!(last.volume, 0.0);
        assert_eq!(last.date.to_string(), "2024-01-02");
    }

    #[test]
    fn skips_null_bars() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{},{},{}],
            "indicators":{{"quote":[{{"open":[1.0,null,3.0],"high":[1.0,null,3.0],
            "low":[1.0,null,3.0],"close":[1.0,null,3.0],"volume":[1,null,3]}}]}}}}],"error":null}}}}"#,
            JAN_1_2024,
            JAN_1_2024 + DAY,
            JAN_1_2024 + 2 * DAY
        );
        let series = parse_chart("AAPL", &body).unwrap();
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 3.0]);
    }

    #[test]
    fn duplicate_day_keeps_latest_snapshot() {
        let body = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{},{}],
            "indicators":{{"quote":[{{"open":[1.0,1.0],"high":[2.0,2.0],
            "low":[0.5,0.5],"close":[1.0,1.8],"volume":[10,20]}}]}}}}],"error":null}}}}"#,
            JAN_1_2024,
            JAN_1_2024 + 3600
        );
        let series = parse_chart("ETH-USD", &body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.latest().unwrap().close, 1.8);
    }

    #[test]
    fn error_payload_is_err() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart("NOPE", body).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn empty_result_is_empty_series() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let series = parse_chart("TSLA", body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn malformed_json_is_err() {
        assert!(parse_chart("TSLA", "not json").is_err());
    }
}
