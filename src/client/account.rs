//! Authenticated account reads

use super::{check_response, fetch_server_time, AccountData};
use crate::client::auth::Credentials;
use crate::error::{BotError, Result};
use crate::types::{AssetBalance, BalanceMap};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Client for signed account endpoints
#[derive(Clone)]
pub struct AccountClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    balances: Vec<RawBalance>,
}

#[derive(Debug, Deserialize)]
struct RawBalance {
    asset: String,
    free: String,
    locked: String,
}

impl AccountClient {
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

    /// Fetch wallet balances, keeping only nonzero entries.
    ///
    /// The request is timestamped with the venue's server time, not the
    /// local clock, then signed over the ordered parameters.
    pub async fn balances(&self) -> Result<BalanceMap> {
        let timestamp = fetch_server_time(&self.http, &self.base_url).await?;

        let mut params = vec![("timestamp".to_string(), timestamp.to_string())];
        let signature = self.credentials.signer.sign(&params)?;
        params.push(("signature".to_string(), signature));

        let url = format!("{}/api/v3/account", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::Auth(format!("HTTP {}: {}", status, body)));
        }
        let resp = check_response(resp).await?;

        let account: AccountResponse = resp.json().await?;
        collect_nonzero(account.balances)
    }
}

/// Parse raw balances, keeping only assets with a nonzero free or locked amount
fn collect_nonzero(raw_balances: Vec<RawBalance>) -> Result<BalanceMap> {
    let mut balances = BalanceMap::new();
    for raw in raw_balances {
        let free: Decimal = parse_amount(&raw.free, &raw.asset)?;
        let locked: Decimal = parse_amount(&raw.locked, &raw.asset)?;
        if free > Decimal::ZERO || locked > Decimal::ZERO {
            balances.insert(raw.asset, AssetBalance { free, locked });
        }
    }
    Ok(balances)
}

#[async_trait]
impl AccountData for AccountClient {
    async fn balances(&self) -> Result<BalanceMap> {
        AccountClient::balances(self).await
    }
}

fn parse_amount(raw: &str, asset: &str) -> Result<Decimal> {
    raw.parse()
        .map_err(|e| BotError::MarketData(format!("invalid balance for {}: {}", asset, e)))
}
