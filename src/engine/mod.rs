//! LLM-backed trading decisions
//!
//! The engine builds a market/balance snapshot, asks the reasoning service
//! for a structured decision, and parses it. Deciding and acting are
//! deliberately decoupled: execution belongs to the caller, so decisions can
//! be logged, tested, or vetoed without touching the venue.

pub mod llm;

#[cfg(test)]
mod tests;

pub use llm::LlmClient;

use crate::client::{AccountData, MarketData};
use crate::error::Result;
use crate::types::{BalanceMap, MarketSnapshot, TradeDecision};
use async_trait::async_trait;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a cryptocurrency trading assistant. \
Analyze the market data and balance information provided and make a trading decision. \
Respond with a JSON object containing:\n\
- action: \"BUY\", \"SELL\" or \"HOLD\"\n\
- quantity: amount of the base asset to trade (omit for HOLD)\n\
- reasoning: brief explanation of the decision\n\
Consider the available balances when suggesting quantities. Only valid JSON, no other text.";

/// External reasoning service returning raw model output
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Model name for logging
    fn name(&self) -> &str;
}

/// Builds decision inputs and delegates to the reasoning service
pub struct DecisionEngine {
    market: Arc<dyn MarketData>,
    account: Arc<dyn AccountData>,
    model: Arc<dyn ReasoningModel>,
    universe: Vec<String>,
}

impl DecisionEngine {
    pub fn new(
        market: Arc<dyn MarketData>,
        account: Arc<dyn AccountData>,
        model: Arc<dyn ReasoningModel>,
        universe: Vec<String>,
    ) -> Self {
        Self {
            market,
            account,
            model,
            universe,
        }
    }

    /// Configured symbol universe
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Symbols for one run: the given symbol, or the whole universe
    pub fn symbols_for(&self, symbol: Option<&str>) -> Vec<String> {
        match symbol {
            Some(s) => vec![s.to_string()],
            None => self.universe.clone(),
        }
    }

    /// Fetch a fresh snapshot and balances, then ask the model to decide.
    ///
    /// Unknown actions from the model are a `DecisionParse` error rather
    /// than an implicit HOLD; coercing them would mask an upstream contract
    /// violation.
    pub async fn decide(&self, symbol: &str) -> Result<TradeDecision> {
        let snapshot = self.market.snapshot(symbol).await?;
        let balances = self.account.balances().await?;

        let user_prompt = build_user_prompt(&snapshot, &balances);
        let raw = self.model.complete(SYSTEM_PROMPT, &user_prompt).await?;
        let decision = TradeDecision::from_json(&raw)?;

        tracing::debug!(
            "Decision for {} from {}: {}",
            symbol,
            self.model.name(),
            decision.action()
        );
        Ok(decision)
    }
}

fn build_user_prompt(snapshot: &MarketSnapshot, balances: &BalanceMap) -> String {
    let snapshot_json = serde_json::to_string_pretty(snapshot).unwrap_or_default();
    let balances_json = serde_json::to_string_pretty(balances).unwrap_or_default();

    format!(
        "Current market data for {}:\n{}\n\nAvailable balances:\n{}\n\n\
         Make a trading decision based on this information.",
        snapshot.symbol, snapshot_json, balances_json
    )
}
