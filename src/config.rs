//! Configuration loading
//!
//! All settings come from a TOML file (default `config.toml`), with a `.env`
//! loaded beforehand for anything the deployment keeps out of the file.

use crate::error::{BotError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Top-level bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    pub llm: LlmConfig,
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub trading: TradingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| BotError::Config(format!("failed to read {}: {}", path, e)))?;

        settings
            .try_deserialize()
            .map_err(|e| BotError::Config(format!("invalid config: {}", e)))
    }
}

/// Exchange credentials and network selection
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub api_key: String,
    /// Path to the PEM-encoded RSA private key registered with the venue
    pub private_key_path: String,
    #[serde(default = "default_true")]
    pub testnet: bool,
}

impl BinanceConfig {
    pub fn base_url(&self) -> &'static str {
        if self.testnet {
            "https://testnet.binance.vision"
        } else {
            "https://api.binance.com"
        }
    }
}

/// Reasoning service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// "openai", "deepseek", "ollama" or "compatible"
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Telegram notification sink
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Trading loop and order policy settings
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Symbol universe analyzed each cycle
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    /// Seconds between cycle starts
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Offset applied when deriving a default limit price (0.01 = 1%)
    #[serde(default = "default_limit_offset_pct")]
    pub limit_offset_pct: Decimal,
    /// Decimal places the derived price is rounded to
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u32,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            interval_secs: default_interval_secs(),
            limit_offset_pct: default_limit_offset_pct(),
            price_decimals: default_price_decimals(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_symbols() -> Vec<String> {
    vec![
        "ETHUSDT".to_string(),
        "ETHBTC".to_string(),
        "ETHBONK".to_string(),
        "ETHDOGE".to_string(),
    ]
}

fn default_interval_secs() -> u64 {
    60
}

fn default_limit_offset_pct() -> Decimal {
    dec!(0.01)
}

fn default_price_decimals() -> u32 {
    2
}
