//! Tests for the decision engine

#[cfg(test)]
mod tests {
    use crate::engine::{build_user_prompt, DecisionEngine};
    use crate::error::BotError;
    use crate::testing::{snapshot, ScriptedModel, StubAccount, StubMarket};
    use crate::types::{AssetBalance, BalanceMap, TradeDecision};
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn balances() -> BalanceMap {
        let mut map = BalanceMap::new();
        map.insert(
            "USDT".to_string(),
            AssetBalance {
                free: dec!(1000),
                locked: dec!(0),
            },
        );
        map.insert(
            "ETH".to_string(),
            AssetBalance {
                free: dec!(2.5),
                locked: dec!(0.5),
            },
        );
        map
    }

    fn make_engine(model: ScriptedModel) -> (DecisionEngine, Arc<StubMarket>, Arc<StubAccount>) {
        let market = Arc::new(StubMarket::new().with_snapshot(snapshot("ETHUSDT", dec!(3000))));
        let account = Arc::new(StubAccount::new(balances()));
        let engine = DecisionEngine::new(
            market.clone(),
            account.clone(),
            Arc::new(model),
            vec!["ETHUSDT".to_string(), "ETHBTC".to_string()],
        );
        (engine, market, account)
    }

    #[tokio::test]
    async fn decide_parses_buy_decision() {
        let model =
            ScriptedModel::always(r#"{"action":"BUY","quantity":"0.1","reasoning":"uptrend"}"#);
        let (engine, market, account) = make_engine(model);

        let decision = engine.decide("ETHUSDT").await.unwrap();
        assert_eq!(
            decision,
            TradeDecision::Buy {
                quantity: dec!(0.1),
                reasoning: "uptrend".to_string(),
            }
        );
        // One snapshot and one balance fetch per decision
        assert_eq!(market.snapshot_calls.load(Ordering::SeqCst), 1);
        assert_eq!(account.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn decide_parses_hold_decision() {
        let model = ScriptedModel::always(r#"{"action":"HOLD","reasoning":"flat market"}"#);
        let (engine, _market, _account) = make_engine(model);

        let decision = engine.decide("ETHUSDT").await.unwrap();
        assert_eq!(
            decision,
            TradeDecision::Hold {
                reasoning: "flat market".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn decide_rejects_unknown_action() {
        let model =
            ScriptedModel::always(r#"{"action":"SHORT","quantity":"1","reasoning":"downtrend"}"#);
        let (engine, _market, _account) = make_engine(model);

        let result = engine.decide("ETHUSDT").await;
        assert!(matches!(result, Err(BotError::DecisionParse(_))));
    }

    #[tokio::test]
    async fn decide_propagates_market_failure_without_calling_model() {
        let market = Arc::new(StubMarket::new()); // no snapshot configured
        let account = Arc::new(StubAccount::new(balances()));
        let model = Arc::new(ScriptedModel::always(
            r#"{"action":"HOLD","reasoning":"unused"}"#,
        ));
        let engine = DecisionEngine::new(
            market,
            account,
            model.clone(),
            vec!["ETHUSDT".to_string()],
        );

        let result = engine.decide("ETHUSDT").await;
        assert!(matches!(result, Err(BotError::MarketData(_))));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn symbols_for_single_symbol_overrides_universe() {
        let (engine, _market, _account) =
            make_engine(ScriptedModel::always(r#"{"action":"HOLD","reasoning":""}"#));

        assert_eq!(engine.symbols_for(Some("BTCUSDT")), vec!["BTCUSDT"]);
        assert_eq!(engine.symbols_for(None), vec!["ETHUSDT", "ETHBTC"]);
        assert_eq!(engine.universe(), ["ETHUSDT", "ETHBTC"]);
    }

    #[test]
    fn user_prompt_carries_market_and_balances() {
        let prompt = build_user_prompt(&snapshot("ETHUSDT", dec!(3000)), &balances());

        assert!(prompt.contains("ETHUSDT"));
        assert!(prompt.contains("3000"));
        assert!(prompt.contains("USDT"));
        assert!(prompt.contains("1000"));
        assert!(prompt.contains("ETH"));
    }
}
