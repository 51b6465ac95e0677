//! Tests for core types

#[cfg(test)]
mod tests {
    use crate::error::BotError;
    use crate::types::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn market_buy_base() -> OrderRequest {
        OrderRequest::market("BTCUSDT", Side::Buy, dec!(0.01))
    }

    #[test]
    fn test_side_strings() {
        assert_eq!(Side::Buy.as_str(), "BUY");
        assert_eq!(Side::Sell.as_str(), "SELL");
        assert_eq!(format!("{}", Side::Sell), "SELL");
    }

    #[test]
    fn test_order_type_strings() {
        assert_eq!(OrderType::Market.as_str(), "MARKET");
        assert_eq!(OrderType::StopLossLimit.as_str(), "STOP_LOSS_LIMIT");
        assert_eq!(OrderType::TakeProfitLimit.as_str(), "TAKE_PROFIT_LIMIT");
    }

    #[test]
    fn test_order_type_is_limit() {
        assert!(OrderType::Limit.is_limit());
        assert!(OrderType::StopLossLimit.is_limit());
        assert!(OrderType::TakeProfitLimit.is_limit());
        assert!(!OrderType::Market.is_limit());
        assert!(!OrderType::StopLoss.is_limit());
        assert!(!OrderType::TakeProfit.is_limit());
    }

    #[test]
    fn test_time_in_force_default_is_gtc() {
        assert_eq!(TimeInForce::default(), TimeInForce::Gtc);
        assert_eq!(TimeInForce::Gtc.as_str(), "GTC");
        assert_eq!(TimeInForce::Ioc.as_str(), "IOC");
        assert_eq!(TimeInForce::Fok.as_str(), "FOK");
    }

    #[test]
    fn test_quote_spread() {
        let quote = Quote {
            symbol: "BTCUSDT".to_string(),
            bid_price: dec!(99),
            bid_qty: dec!(1),
            ask_price: dec!(100),
            ask_qty: dec!(2),
        };
        assert_eq!(quote.spread(), dec!(1));
        // (100/99 - 1) * 100
        assert!(quote.spread_pct() > dec!(1.0101));
        assert!(quote.spread_pct() < dec!(1.0102));
    }

    #[test]
    fn test_validate_market_buy_base_quantity() {
        assert!(market_buy_base().validate().is_ok());
    }

    #[test]
    fn test_validate_market_buy_quote_quantity() {
        let req = OrderRequest::market_buy_quote("BTCUSDT", dec!(100));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_market_buy_both_quantities() {
        let mut req = market_buy_base();
        req.quote_quantity = Some(dec!(100));
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_market_buy_no_quantity() {
        let mut req = market_buy_base();
        req.quantity = None;
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_market_buy_zero_quantity() {
        let req = OrderRequest::market("BTCUSDT", Side::Buy, Decimal::ZERO);
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_market_sell_requires_quantity() {
        let mut req = OrderRequest::market("BTCUSDT", Side::Sell, dec!(0.01));
        assert!(req.validate().is_ok());

        req.quantity = None;
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_negative_quantity() {
        let req = OrderRequest::market("BTCUSDT", Side::Sell, dec!(-1));
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_limit_requires_price() {
        let mut req = OrderRequest::limit("BTCUSDT", Side::Buy, dec!(0.01), dec!(50000));
        assert!(req.validate().is_ok());

        req.price = None;
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_stop_loss_limit_requires_price() {
        let mut req = OrderRequest::limit("BTCUSDT", Side::Sell, dec!(0.01), dec!(50000));
        req.order_type = OrderType::StopLossLimit;
        assert!(req.validate().is_ok());

        req.price = None;
        assert!(matches!(req.validate(), Err(BotError::Validation(_))));
    }

    #[test]
    fn test_validate_stop_loss_without_price_ok() {
        let mut req = OrderRequest::market("BTCUSDT", Side::Sell, dec!(0.01));
        req.order_type = OrderType::StopLoss;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_order_result_display() {
        let result = OrderResult {
            order_id: 42,
            status: "FILLED".to_string(),
            filled_quantity: dec!(0.1),
            counter_value: dec!(300),
        };
        assert_eq!(
            format!("{}", result),
            "order 42 FILLED (filled 0.1, quote 300)"
        );
    }

    #[test]
    fn test_decision_parse_buy() {
        let decision = TradeDecision::from_json(
            r#"{"action":"BUY","quantity":"0.1","reasoning":"uptrend"}"#,
        )
        .unwrap();
        assert_eq!(
            decision,
            TradeDecision::Buy {
                quantity: dec!(0.1),
                reasoning: "uptrend".to_string(),
            }
        );
    }

    #[test]
    fn test_decision_parse_numeric_quantity() {
        let decision =
            TradeDecision::from_json(r#"{"action":"SELL","quantity":0.25,"reasoning":"top"}"#)
                .unwrap();
        assert_eq!(
            decision,
            TradeDecision::Sell {
                quantity: dec!(0.25),
                reasoning: "top".to_string(),
            }
        );
    }

    #[test]
    fn test_decision_parse_hold_ignores_quantity() {
        let decision = TradeDecision::from_json(
            r#"{"action":"HOLD","quantity":"5","reasoning":"flat market"}"#,
        )
        .unwrap();
        assert_eq!(
            decision,
            TradeDecision::Hold {
                reasoning: "flat market".to_string(),
            }
        );
    }

    #[test]
    fn test_decision_parse_lowercase_action() {
        let decision =
            TradeDecision::from_json(r#"{"action":"buy","quantity":"1","reasoning":""}"#).unwrap();
        assert_eq!(decision.action(), "BUY");
    }

    #[test]
    fn test_decision_parse_unknown_action_rejected() {
        // "SHORT" must not be coerced to HOLD
        let result = TradeDecision::from_json(
            r#"{"action":"SHORT","quantity":"0.1","reasoning":"downtrend"}"#,
        );
        assert!(matches!(result, Err(BotError::DecisionParse(_))));
    }

    #[test]
    fn test_decision_parse_missing_action() {
        let result = TradeDecision::from_json(r#"{"quantity":"0.1","reasoning":"?"}"#);
        assert!(matches!(result, Err(BotError::DecisionParse(_))));
    }

    #[test]
    fn test_decision_parse_invalid_json() {
        let result = TradeDecision::from_json("not json at all");
        assert!(matches!(result, Err(BotError::DecisionParse(_))));
    }

    #[test]
    fn test_decision_parse_missing_quantity_for_buy() {
        let result = TradeDecision::from_json(r#"{"action":"BUY","reasoning":"uptrend"}"#);
        assert!(matches!(result, Err(BotError::DecisionParse(_))));
    }

    #[test]
    fn test_decision_parse_nonpositive_quantity() {
        let zero = TradeDecision::from_json(r#"{"action":"BUY","quantity":"0","reasoning":""}"#);
        assert!(matches!(zero, Err(BotError::DecisionParse(_))));

        let negative =
            TradeDecision::from_json(r#"{"action":"SELL","quantity":"-1","reasoning":""}"#);
        assert!(matches!(negative, Err(BotError::DecisionParse(_))));
    }

    #[test]
    fn test_decision_parse_tolerates_surrounding_prose() {
        let raw = "Here is my decision:\n{\"action\":\"HOLD\",\"reasoning\":\"waiting\"}\nThanks!";
        let decision = TradeDecision::from_json(raw).unwrap();
        assert_eq!(decision.action(), "HOLD");
    }

    #[test]
    fn test_decision_json_round_trip() {
        let decisions = vec![
            TradeDecision::Buy {
                quantity: dec!(0.1),
                reasoning: "uptrend".to_string(),
            },
            TradeDecision::Sell {
                quantity: dec!(2.5),
                reasoning: "overbought".to_string(),
            },
            TradeDecision::Hold {
                reasoning: "flat market".to_string(),
            },
        ];

        for decision in decisions {
            let json = decision.to_json().to_string();
            let parsed = TradeDecision::from_json(&json).unwrap();
            assert_eq!(parsed, decision);
        }
    }
}
