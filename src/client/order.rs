//! Order submission gateway
//!
//! Turns a validated `OrderRequest` into the venue's form-encoded wire
//! format: canonical parameter order with `timestamp` last, signature
//! appended after signing. A refused order surfaces the venue payload
//! verbatim as `OrderRejected`; nothing here retries.

use super::{fetch_server_time, OrderApi};
use crate::client::auth::Credentials;
use crate::error::{BotError, Result};
use crate::types::{OrderRequest, OrderResult, OrderType, Side};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone)]
pub struct OrderClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    #[serde(rename = "orderId")]
    order_id: i64,
    status: String,
    #[serde(rename = "executedQty", default)]
    executed_qty: Option<String>,
    #[serde(rename = "cummulativeQuoteQty", default)]
    cumulative_quote_qty: Option<String>,
}

impl OrderClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn build_params(request: &OrderRequest, timestamp: i64) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("symbol".into(), request.symbol.clone()),
            ("side".into(), request.side.as_str().into()),
            ("type".into(), request.order_type.as_str().into()),
        ];

        if request.order_type == OrderType::Market && request.side == Side::Buy {
            if let Some(quote_qty) = request.quote_quantity {
                params.push(("quoteOrderQty".into(), quote_qty.to_string()));
            } else if let Some(qty) = request.quantity {
                params.push(("quantity".into(), qty.to_string()));
            }
        } else if let Some(qty) = request.quantity {
            params.push(("quantity".into(), qty.to_string()));
        }

        if request.order_type.is_limit() {
            if let Some(price) = request.price {
                params.push(("price".into(), price.to_string()));
            }
            params.push(("timeInForce".into(), request.time_in_force.as_str().into()));
        }

        // timestamp is always the last signed parameter
        params.push(("timestamp".into(), timestamp.to_string()));
        params
    }
}

#[async_trait]
impl OrderApi for OrderClient {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResult> {
        let timestamp = fetch_server_time(&self.http, &self.base_url).await?;

        let mut params = Self::build_params(request, timestamp);
        let signature = self.credentials.signer.sign(&params)?;
        params.push(("signature".into(), signature));

        let url = format!("{}/api/v3/order", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::OrderRejected(format!("HTTP {}: {}", status, body)));
        }

        let order: OrderResponse = resp.json().await?;
        Ok(OrderResult {
            order_id: order.order_id,
            status: order.status,
            filled_quantity: parse_optional(order.executed_qty.as_deref()),
            counter_value: parse_optional(order.cumulative_quote_qty.as_deref()),
        })
    }
}

fn parse_optional(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| s.parse().ok()).unwrap_or(Decimal::ZERO)
}
