//! Bullseye Trader
//!
//! An LLM-driven periodic trading bot for Binance spot markets.
//!
//! ## Architecture
//!
//! ```text
//! TradingLoop → AccountClient (balances) → DecisionEngine (LLM)
//!                                              ↓ (unless HOLD)
//!                                         OrderExecutor → Notifier
//!
//! MarketDataClient and RequestSigner sit underneath as shared dependencies.
//! ```
//!
//! Each cycle is a strictly ordered sequence of awaits; nothing in a cycle
//! runs concurrently, and cycles never overlap.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod notify;
pub mod testing;
pub mod trader;
pub mod types;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod config_tests;
