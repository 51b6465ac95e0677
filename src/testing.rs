//! In-memory stand-ins for the client and reasoning traits
//!
//! Used by unit tests to drive cycles without a network. Every stub counts
//! its calls so tests can assert that a path performed zero (or exactly N)
//! venue interactions.

use crate::client::{AccountData, MarketData, OrderApi};
use crate::engine::ReasoningModel;
use crate::error::{BotError, Result};
use crate::types::{BalanceMap, MarketSnapshot, OrderRequest, OrderResult, Quote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn quote(symbol: &str, bid: Decimal, ask: Decimal) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        bid_price: bid,
        bid_qty: Decimal::ONE,
        ask_price: ask,
        ask_qty: Decimal::ONE,
    }
}

pub fn snapshot(symbol: &str, price: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        symbol: symbol.to_string(),
        price,
        price_change_pct: Decimal::ZERO,
        high_24h: price,
        low_24h: price,
        volume_24h: Decimal::ONE_HUNDRED,
    }
}

/// Market data stub with per-operation call counters
#[derive(Default)]
pub struct StubMarket {
    pub quote: Option<Quote>,
    pub snapshot: Option<MarketSnapshot>,
    pub quote_calls: AtomicUsize,
    pub snapshot_calls: AtomicUsize,
}

impl StubMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_snapshot(mut self, snapshot: MarketSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst) + self.snapshot_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketData for StubMarket {
    async fn quote(&self, _symbol: &str) -> Result<Quote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quote
            .clone()
            .ok_or_else(|| BotError::MarketData("no quote configured".into()))
    }

    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .clone()
            .ok_or_else(|| BotError::MarketData(format!("no snapshot configured for {}", symbol)))
    }
}

/// Account stub returning a fixed balance map
pub struct StubAccount {
    pub balances: BalanceMap,
    pub calls: AtomicUsize,
}

impl StubAccount {
    pub fn new(balances: BalanceMap) -> Self {
        Self {
            balances,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AccountData for StubAccount {
    async fn balances(&self) -> Result<BalanceMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.balances.clone())
    }
}

/// Order gateway stub recording every submitted request
#[derive(Default)]
pub struct StubOrders {
    pub submitted: Mutex<Vec<OrderRequest>>,
    pub reject_with: Option<String>,
}

impl StubOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            reject_with: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderApi for StubOrders {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResult> {
        self.submitted.lock().unwrap().push(request.clone());

        if let Some(message) = &self.reject_with {
            return Err(BotError::OrderRejected(message.clone()));
        }

        Ok(OrderResult {
            order_id: 1,
            status: "FILLED".to_string(),
            filled_quantity: request
                .quantity
                .or(request.quote_quantity)
                .unwrap_or(Decimal::ZERO),
            counter_value: Decimal::ZERO,
        })
    }
}

/// Reasoning stub replaying scripted responses in order
pub struct ScriptedModel {
    queue: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    pub calls: AtomicUsize,
}

impl ScriptedModel {
    /// Replay responses one per call, erroring when exhausted
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            queue: Mutex::new(responses.into_iter().map(String::from).collect()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Return the same response for every call
    pub fn always(response: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Some(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReasoningModel for ScriptedModel {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(response) = self.queue.lock().unwrap().pop_front() {
            return Ok(response);
        }
        self.fallback
            .clone()
            .ok_or_else(|| BotError::DecisionParse("scripted responses exhausted".into()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
