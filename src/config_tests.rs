//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trading_config_defaults() {
        let config: TradingConfig = toml::from_str("").unwrap();
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.limit_offset_pct, dec!(0.01));
        assert_eq!(config.price_decimals, 2);
        assert!(config.symbols.contains(&"ETHUSDT".to_string()));
    }

    #[test]
    fn test_trading_config_deserialize() {
        let toml_str = r#"
symbols = ["BTCUSDT", "ETHUSDT"]
interval_secs = 300
limit_offset_pct = 0.005
price_decimals = 4
"#;
        let config: TradingConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(config.interval_secs, 300);
        assert_eq!(config.limit_offset_pct, dec!(0.005));
        assert_eq!(config.price_decimals, 4);
    }

    #[test]
    fn test_binance_config_defaults_to_testnet() {
        let toml_str = r#"
api_key = "key123"
private_key_path = "test-prv-key.pem"
"#;
        let config: BinanceConfig = toml::from_str(toml_str).unwrap();
        assert!(config.testnet);
        assert_eq!(config.base_url(), "https://testnet.binance.vision");
    }

    #[test]
    fn test_binance_config_production_url() {
        let toml_str = r#"
api_key = "key123"
private_key_path = "prv-key.pem"
testnet = false
"#;
        let config: BinanceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url(), "https://api.binance.com");
    }

    #[test]
    fn test_llm_config_minimal() {
        let toml_str = r#"
provider = "deepseek"
api_key = "sk-xxx"
"#;
        let config: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider, "deepseek");
        assert_eq!(config.api_key, "sk-xxx");
        assert!(config.model.is_none());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_llm_config_with_model() {
        let toml_str = r#"
provider = "openai"
api_key = "sk-xxx"
model = "gpt-4o"
base_url = "https://api.openai.com"
"#;
        let config: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, Some("gpt-4o".to_string()));
        assert_eq!(config.base_url, Some("https://api.openai.com".to_string()));
    }

    #[test]
    fn test_llm_config_ollama_no_key() {
        let toml_str = r#"
provider = "ollama"
"#;
        let config: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.api_key, "");
    }

    #[test]
    fn test_telegram_config() {
        let toml_str = r#"
bot_token = "123:abc"
chat_id = "652152357"
"#;
        let config: TelegramConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.chat_id, "652152357");
    }

    #[test]
    fn test_full_config() {
        let toml_str = r#"
[binance]
api_key = "key123"
private_key_path = "test-prv-key.pem"

[llm]
provider = "openai"
api_key = "sk-xxx"

[telegram]
bot_token = "123:abc"
chat_id = "652152357"

[trading]
symbols = ["ETHUSDT"]
interval_secs = 120
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.binance.api_key, "key123");
        assert!(config.telegram.is_some());
        assert_eq!(config.trading.symbols, vec!["ETHUSDT"]);
        assert_eq!(config.trading.interval_secs, 120);
        assert_eq!(config.trading.limit_offset_pct, dec!(0.01));
    }

    #[test]
    fn test_config_telegram_optional() {
        let toml_str = r#"
[binance]
api_key = "key123"
private_key_path = "test-prv-key.pem"

[llm]
provider = "ollama"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.telegram.is_none());
        // [trading] section absent entirely
        assert_eq!(config.trading.interval_secs, 60);
    }
}
