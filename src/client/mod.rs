//! Venue REST clients
//!
//! Concrete clients for the exchange REST API, plus the trait seams the
//! pipeline components depend on so tests can substitute stubs.

pub mod account;
pub mod auth;
pub mod market;
pub mod order;

pub use account::AccountClient;
pub use auth::{Credentials, RequestSigner};
pub use market::MarketDataClient;
pub use order::OrderClient;

use crate::error::{BotError, Result};
use crate::types::{BalanceMap, MarketSnapshot, OrderRequest, OrderResult, Quote};
use async_trait::async_trait;
use reqwest::Client;

/// Public market data reads
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Quote>;
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot>;
}

/// Authenticated account reads
#[async_trait]
pub trait AccountData: Send + Sync {
    async fn balances(&self) -> Result<BalanceMap>;
}

/// Order submission gateway
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResult>;
}

/// Venue server time in epoch milliseconds.
///
/// Authenticated calls timestamp with this rather than the local clock; the
/// venue rejects requests that drift outside its tolerance window.
pub(crate) async fn fetch_server_time(http: &Client, base_url: &str) -> Result<i64> {
    let url = format!("{}/api/v3/time", base_url);
    let resp = check_response(http.get(&url).send().await?).await?;
    let value: serde_json::Value = resp.json().await?;

    value["serverTime"]
        .as_i64()
        .ok_or_else(|| BotError::MarketData("invalid server time response".into()))
}

/// Map a non-success response to a `MarketData` error carrying the body
pub(crate) async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(BotError::MarketData(format!("HTTP {}: {}", status, body)))
}
