//! Core domain types shared across the bot
//!
//! All prices and quantities are `rust_decimal::Decimal`; wire values arrive
//! as decimal strings and are parsed at the client boundary, so no string
//! prices leak past `src/client`.

use crate::error::{BotError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type as accepted by the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLoss => "STOP_LOSS",
            OrderType::StopLossLimit => "STOP_LOSS_LIMIT",
            OrderType::TakeProfit => "TAKE_PROFIT",
            OrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
        }
    }

    /// Types that carry a limit price (and a time-in-force)
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            OrderType::Limit | OrderType::StopLossLimit | OrderType::TakeProfitLimit
        )
    }
}

/// Time in force for limit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancel
    #[default]
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// Fill or kill
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

/// Best bid/ask read for a symbol
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub bid_price: Decimal,
    pub bid_qty: Decimal,
    pub ask_price: Decimal,
    pub ask_qty: Decimal,
}

impl Quote {
    pub fn spread(&self) -> Decimal {
        self.ask_price - self.bid_price
    }

    /// Spread as a percentage of the bid
    pub fn spread_pct(&self) -> Decimal {
        if self.bid_price.is_zero() {
            return Decimal::ZERO;
        }
        (self.ask_price / self.bid_price - Decimal::ONE) * Decimal::ONE_HUNDRED
    }
}

/// Point-in-time 24h market read; never mutated after construction
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: Decimal,
    pub price_change_pct: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    pub volume_24h: Decimal,
}

/// One OHLCV kline
#[derive(Debug, Clone)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub trades: u64,
    pub close_time: DateTime<Utc>,
}

/// Free/locked amounts for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub free: Decimal,
    pub locked: Decimal,
}

/// Nonzero balances keyed by asset symbol
pub type BalanceMap = BTreeMap<String, AssetBalance>;

/// A validated-on-submit order request
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    /// Base-asset quantity
    pub quantity: Option<Decimal>,
    /// Quote-asset quantity, MARKET BUY only
    pub quote_quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Market order sized in the base asset
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity: Some(quantity),
            quote_quantity: None,
            price: None,
            time_in_force: TimeInForce::default(),
        }
    }

    /// Market buy sized in the quote asset (e.g. USDT to spend)
    pub fn market_buy_quote(symbol: impl Into<String>, quote_quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Buy,
            order_type: OrderType::Market,
            quantity: None,
            quote_quantity: Some(quote_quantity),
            price: None,
            time_in_force: TimeInForce::default(),
        }
    }

    /// Limit order at an explicit price
    pub fn limit(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity: Some(quantity),
            quote_quantity: None,
            price: Some(price),
            time_in_force: TimeInForce::default(),
        }
    }

    /// Validate the request before it touches the network.
    ///
    /// Rules, checked in order:
    /// 1. MARKET BUY: exactly one of quantity / quote_quantity.
    /// 2. Everything else: quantity present and positive.
    /// 3. Limit-price types: price present.
    pub fn validate(&self) -> Result<()> {
        if self.order_type == OrderType::Market && self.side == Side::Buy {
            match (self.quantity, self.quote_quantity) {
                (Some(_), Some(_)) => {
                    return Err(BotError::Validation(
                        "MARKET BUY takes either quantity or quote_quantity, not both".into(),
                    ));
                }
                (None, None) => {
                    return Err(BotError::Validation(
                        "MARKET BUY requires quantity or quote_quantity".into(),
                    ));
                }
                (Some(q), None) | (None, Some(q)) => {
                    if q <= Decimal::ZERO {
                        return Err(BotError::Validation(
                            "order quantity must be positive".into(),
                        ));
                    }
                }
            }
        } else {
            match self.quantity {
                Some(q) if q > Decimal::ZERO => {}
                Some(_) => {
                    return Err(BotError::Validation(
                        "order quantity must be positive".into(),
                    ));
                }
                None => {
                    return Err(BotError::Validation(format!(
                        "quantity is required for {} orders",
                        self.order_type.as_str()
                    )));
                }
            }
        }

        if self.order_type.is_limit() && self.price.is_none() {
            return Err(BotError::Validation(format!(
                "price is required for {} orders",
                self.order_type.as_str()
            )));
        }

        Ok(())
    }
}

/// Venue response to an order submission; only status is ever inspected
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order_id: i64,
    pub status: String,
    pub filled_quantity: Decimal,
    /// Cumulative quote-asset value of the fills
    pub counter_value: Decimal,
}

impl fmt::Display for OrderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order {} {} (filled {}, quote {})",
            self.order_id, self.status, self.filled_quantity, self.counter_value
        )
    }
}

/// Parsed trading decision from the reasoning service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeDecision {
    Buy { quantity: Decimal, reasoning: String },
    Sell { quantity: Decimal, reasoning: String },
    Hold { reasoning: String },
}

impl TradeDecision {
    pub fn action(&self) -> &'static str {
        match self {
            TradeDecision::Buy { .. } => "BUY",
            TradeDecision::Sell { .. } => "SELL",
            TradeDecision::Hold { .. } => "HOLD",
        }
    }

    /// Parse the reasoning-service JSON schema `{action, quantity, reasoning}`.
    ///
    /// Unknown `action` tags are an error, never coerced to HOLD: a value we
    /// do not recognize means the upstream contract is broken.
    pub fn from_json(raw: &str) -> Result<Self> {
        // Tolerate prose around the object; the venue of truth is the JSON.
        let json_str = match (raw.find('{'), raw.rfind('}')) {
            (Some(start), Some(end)) if end >= start => &raw[start..=end],
            _ => raw,
        };

        let value: serde_json::Value = serde_json::from_str(json_str)
            .map_err(|e| BotError::DecisionParse(format!("invalid JSON: {}", e)))?;

        let action = value["action"]
            .as_str()
            .ok_or_else(|| BotError::DecisionParse("missing action field".into()))?
            .to_uppercase();

        let reasoning = value["reasoning"].as_str().unwrap_or("").to_string();

        match action.as_str() {
            "HOLD" => Ok(TradeDecision::Hold { reasoning }),
            "BUY" => Ok(TradeDecision::Buy {
                quantity: parse_quantity(&value["quantity"])?,
                reasoning,
            }),
            "SELL" => Ok(TradeDecision::Sell {
                quantity: parse_quantity(&value["quantity"])?,
                reasoning,
            }),
            other => Err(BotError::DecisionParse(format!(
                "unknown action {:?}",
                other
            ))),
        }
    }

    /// Serialize back to the reasoning-service schema
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TradeDecision::Buy {
                quantity,
                reasoning,
            } => serde_json::json!({
                "action": "BUY",
                "quantity": quantity.to_string(),
                "reasoning": reasoning,
            }),
            TradeDecision::Sell {
                quantity,
                reasoning,
            } => serde_json::json!({
                "action": "SELL",
                "quantity": quantity.to_string(),
                "reasoning": reasoning,
            }),
            TradeDecision::Hold { reasoning } => serde_json::json!({
                "action": "HOLD",
                "reasoning": reasoning,
            }),
        }
    }
}

fn parse_quantity(value: &serde_json::Value) -> Result<Decimal> {
    let quantity: Decimal = match value {
        serde_json::Value::String(s) => s
            .parse()
            .map_err(|e| BotError::DecisionParse(format!("bad quantity {:?}: {}", s, e)))?,
        serde_json::Value::Number(n) => n
            .to_string()
            .parse()
            .map_err(|e| BotError::DecisionParse(format!("bad quantity {}: {}", n, e)))?,
        _ => {
            return Err(BotError::DecisionParse(
                "quantity is required for BUY/SELL".into(),
            ));
        }
    };

    if quantity <= Decimal::ZERO {
        return Err(BotError::DecisionParse(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    Ok(quantity)
}
