//! Yahoo Finance API client

use crate::error::{MarketError, Result};
use crate::providers::FundamentalsProvider;
use analyst_core::Fundamentals;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "summaryDetail,financialData,defaultKeyStatistics";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; analyst-rs)";

/// Yahoo Finance client for fundamentals and daily price history
pub struct YahooFinanceClient {
    client: reqwest::Client,
}

/// A single daily closing price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the fundamental metric set for a symbol from the
    /// `quoteSummary` endpoint
    pub async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules={QUOTE_SUMMARY_MODULES}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::YahooFinanceError(format!(
                "quoteSummary request for {symbol} failed with {status}: {body}"
            )));
        }

        let body = response.text().await?;
        parse_quote_summary(symbol, &body)
    }

    /// Fetch daily closing prices covering the last `days` calendar days
    pub async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<DailyClose>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let end = Utc::now();
        let start = end - chrono::Duration::days(i64::from(days));

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| MarketError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| MarketError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::YahooFinanceError(e.to_string()))?;

        let mut closes: Vec<DailyClose> = quotes
            .iter()
            .map(|q| DailyClose {
                date: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now)
                    .date_naive(),
                close: q.close,
            })
            .collect();

        // Chart rendering assumes the series is in date order
        closes.sort_by_key(|point| point.date);

        Ok(closes)
    }
}

#[async_trait]
impl FundamentalsProvider for YahooFinanceClient {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        self.fetch_fundamentals(ticker).await
    }
}

// ============================================================================
// quoteSummary wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialData>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialData {
    #[serde(rename = "totalRevenue")]
    total_revenue: Option<RawValue>,
    #[serde(rename = "debtToEquity")]
    debt_to_equity: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct KeyStatistics {
    #[serde(rename = "trailingEps")]
    trailing_eps: Option<RawValue>,
}

/// Yahoo wraps every numeric field in an object carrying the raw value
/// next to preformatted strings
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: Option<&RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

fn parse_quote_summary(symbol: &str, body: &str) -> Result<Fundamentals> {
    let envelope: QuoteSummaryEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.quote_summary.error {
        let reason = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("quoteSummary returned an error")
            .to_string();
        return Err(MarketError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        });
    }

    let result = envelope
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| MarketError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })?;

    let summary = result.summary_detail;
    let financial = result.financial_data;
    let statistics = result.key_statistics;

    Ok(Fundamentals {
        market_cap: raw(summary.as_ref().and_then(|s| s.market_cap.as_ref())),
        pe_ratio: raw(summary.as_ref().and_then(|s| s.trailing_pe.as_ref())),
        revenue: raw(financial.as_ref().and_then(|f| f.total_revenue.as_ref())),
        eps: raw(statistics.as_ref().and_then(|k| k.trailing_eps.as_ref())),
        debt_to_equity: raw(financial.as_ref().and_then(|f| f.debt_to_equity.as_ref())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = r#"{
        "quoteSummary": {
            "result": [{
                "summaryDetail": {
                    "marketCap": {"raw": 3019464343552, "fmt": "3.02T"},
                    "trailingPE": {"raw": 28.5, "fmt": "28.50"}
                },
                "financialData": {
                    "totalRevenue": {"raw": 391035000000, "fmt": "391.04B"},
                    "debtToEquity": {"raw": 145.0, "fmt": "145.00"}
                },
                "defaultKeyStatistics": {
                    "trailingEps": {"raw": 6.57, "fmt": "6.57"}
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_full_response() {
        let fundamentals = parse_quote_summary("AAPL", FULL_RESPONSE).unwrap();
        assert_eq!(fundamentals.market_cap, Some(3019464343552.0));
        assert_eq!(fundamentals.pe_ratio, Some(28.5));
        assert_eq!(fundamentals.revenue, Some(391035000000.0));
        assert_eq!(fundamentals.eps, Some(6.57));
        assert_eq!(fundamentals.debt_to_equity, Some(145.0));
    }

    #[test]
    fn test_parse_partial_response() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {
                        "trailingPE": {"raw": 12.1}
                    }
                }],
                "error": null
            }
        }"#;

        let fundamentals = parse_quote_summary("XYZ", body).unwrap();
        assert_eq!(fundamentals.pe_ratio, Some(12.1));
        assert!(fundamentals.market_cap.is_none());
        assert!(fundamentals.revenue.is_none());
        assert!(fundamentals.eps.is_none());
        assert!(fundamentals.debt_to_equity.is_none());
        assert!(!fundamentals.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{
            "quoteSummary": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "Quote not found for ticker symbol: ZZZZ"
                }
            }
        }"#;

        let err = parse_quote_summary("ZZZZ", body).unwrap_err();
        assert!(matches!(err, MarketError::DataUnavailable { .. }));
        assert!(err.to_string().contains("ZZZZ"));
    }

    #[test]
    fn test_parse_empty_result() {
        let body = r#"{"quoteSummary": {"result": [], "error": null}}"#;

        let err = parse_quote_summary("ZZZZ", body).unwrap_err();
        assert!(matches!(err, MarketError::DataUnavailable { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_fundamentals() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let fundamentals = client.fetch_fundamentals("AAPL").await.unwrap();
        assert!(!fundamentals.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_daily_closes() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let closes = client.daily_closes("AAPL", 30).await.unwrap();
        assert!(!closes.is_empty());
        assert!(closes.windows(2).all(|pair| pair[0].date <= pair[1].date));
        assert!(closes.iter().all(|point| point.close > 0.0));
    }
}
