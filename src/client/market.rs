//! Public market data client
//!
//! Wraps the venue's unauthenticated endpoints: book ticker, 24h ticker,
//! last price, and historical klines. All wire decimals arrive as strings
//! and are parsed here; non-success responses fail without retrying.

use super::{check_response, fetch_server_time, MarketData};
use crate::error::{BotError, Result};
use crate::types::{Candle, MarketSnapshot, Quote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Klines `limit` above this are not honored by the venue
const MAX_CANDLE_LIMIT: u32 = 1000;

#[derive(Clone)]
pub struct MarketDataClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct BookTickerResponse {
    symbol: String,
    #[serde(rename = "bidPrice")]
    bid_price: String,
    #[serde(rename = "bidQty")]
    bid_qty: String,
    #[serde(rename = "askPrice")]
    ask_price: String,
    #[serde(rename = "askQty")]
    ask_qty: String,
}

#[derive(Debug, Deserialize)]
struct Ticker24hResponse {
    #[serde(rename = "lastPrice")]
    last_price: String,
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
    #[serde(rename = "highPrice")]
    high_price: String,
    #[serde(rename = "lowPrice")]
    low_price: String,
    volume: String,
}

#[derive(Debug, Deserialize)]
struct PriceTickerResponse {
    price: String,
}

impl MarketDataClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Best bid/ask for a symbol
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!("{}/api/v3/ticker/bookTicker", self.base_url);
        let resp = check_response(
            self.http.get(&url).query(&[("symbol", symbol)]).send().await?,
        )
        .await?;
        let ticker: BookTickerResponse = resp.json().await?;

        Ok(Quote {
            symbol: ticker.symbol,
            bid_price: parse_decimal(&ticker.bid_price, "bidPrice")?,
            bid_qty: parse_decimal(&ticker.bid_qty, "bidQty")?,
            ask_price: parse_decimal(&ticker.ask_price, "askPrice")?,
            ask_qty: parse_decimal(&ticker.ask_qty, "askQty")?,
        })
    }

    /// 24-hour ticker read
    pub async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        let resp = check_response(
            self.http.get(&url).query(&[("symbol", symbol)]).send().await?,
        )
        .await?;
        let ticker: Ticker24hResponse = resp.json().await?;

        Ok(MarketSnapshot {
            symbol: symbol.to_string(),
            price: parse_decimal(&ticker.last_price, "lastPrice")?,
            price_change_pct: parse_decimal(&ticker.price_change_percent, "priceChangePercent")?,
            high_24h: parse_decimal(&ticker.high_price, "highPrice")?,
            low_24h: parse_decimal(&ticker.low_price, "lowPrice")?,
            volume_24h: parse_decimal(&ticker.volume, "volume")?,
        })
    }

    /// Latest traded price
    pub async fn last_price(&self, symbol: &str) -> Result<Decimal> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let resp = check_response(
            self.http.get(&url).query(&[("symbol", symbol)]).send().await?,
        )
        .await?;
        let ticker: PriceTickerResponse = resp.json().await?;

        parse_decimal(&ticker.price, "price")
    }

    /// Historical OHLCV klines, oldest first.
    ///
    /// `limit` is clamped to the venue maximum of 1000.
    pub async fn candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);

        let mut query: Vec<(String, String)> = vec![
            ("symbol".into(), symbol.to_string()),
            ("interval".into(), interval.to_string()),
            ("limit".into(), limit.min(MAX_CANDLE_LIMIT).to_string()),
        ];
        if let Some(start) = start {
            query.push(("startTime".into(), start.timestamp_millis().to_string()));
        }
        if let Some(end) = end {
            query.push(("endTime".into(), end.timestamp_millis().to_string()));
        }

        let resp = check_response(self.http.get(&url).query(&query).send().await?).await?;
        let rows: Vec<serde_json::Value> = resp.json().await?;

        rows.iter().map(parse_candle).collect()
    }

    /// Venue server time in epoch milliseconds
    pub async fn server_time(&self) -> Result<i64> {
        fetch_server_time(&self.http, &self.base_url).await
    }
}

#[async_trait]
impl MarketData for MarketDataClient {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        MarketDataClient::quote(self, symbol).await
    }

    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        MarketDataClient::snapshot(self, symbol).await
    }
}

fn parse_decimal(raw: &str, field: &str) -> Result<Decimal> {
    raw.parse()
        .map_err(|e| BotError::MarketData(format!("invalid {} {:?}: {}", field, raw, e)))
}

/// One kline row is a heterogeneous JSON array:
/// [openTime, open, high, low, close, volume, closeTime, quoteVolume,
///  trades, takerBuyBase, takerBuyQuote, ignore]
fn parse_candle(row: &serde_json::Value) -> Result<Candle> {
    let field_str = |idx: usize, name: &str| -> Result<Decimal> {
        row[idx]
            .as_str()
            .ok_or_else(|| BotError::MarketData(format!("missing kline field {}", name)))
            .and_then(|s| parse_decimal(s, name))
    };
    let field_millis = |idx: usize, name: &str| -> Result<DateTime<Utc>> {
        let millis = row[idx]
            .as_i64()
            .ok_or_else(|| BotError::MarketData(format!("missing kline field {}", name)))?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| BotError::MarketData(format!("invalid kline {} {}", name, millis)))
    };

    Ok(Candle {
        open_time: field_millis(0, "openTime")?,
        open: field_str(1, "open")?,
        high: field_str(2, "high")?,
        low: field_str(3, "low")?,
        close: field_str(4, "close")?,
        volume: field_str(5, "volume")?,
        close_time: field_millis(6, "closeTime")?,
        quote_volume: field_str(7, "quoteVolume")?,
        trades: row[8].as_u64().unwrap_or(0),
    })
}
