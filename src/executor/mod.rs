//! Order validation and execution


use crate::client::{MarketData, OrderApi};
use crate::config::TradingConfig;
use crate::error::Result;
use crate::types::{OrderRequest, OrderResult, Quote, Side};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Policy for deriving a limit price when the caller gives none.
///
/// The offset and rounding are configuration, not venue-derived: the venue's
/// per-symbol price precision is not consulted here.
#[derive(Debug, Clone, Copy)]
pub struct PricePolicy {
    /// Offset applied to the touch price (0.01 = 1%)
    pub limit_offset_pct: Decimal,
    /// Decimal places the derived price is rounded to
    pub price_decimals: u32,
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self {
            limit_offset_pct: Decimal::new(1, 2),
            price_decimals: 2,
        }
    }
}

impl PricePolicy {
    pub fn from_config(config: &TradingConfig) -> Self {
        Self {
            limit_offset_pct: config.limit_offset_pct,
            price_decimals: config.price_decimals,
        }
    }

    /// Ask × (1 + offset) for BUY, bid × (1 − offset) for SELL, rounded.
    pub fn default_limit_price(&self, side: Side, quote: &Quote) -> Decimal {
        let price = match side {
            Side::Buy => quote.ask_price * (Decimal::ONE + self.limit_offset_pct),
            Side::Sell => quote.bid_price * (Decimal::ONE - self.limit_offset_pct),
        };
        price.round_dp(self.price_decimals)
    }
}

/// Validates and submits orders; never retries a rejected order
pub struct OrderExecutor {
    market: Arc<dyn MarketData>,
    orders: Arc<dyn OrderApi>,
    policy: PricePolicy,
}

impl OrderExecutor {
    pub fn new(market: Arc<dyn MarketData>, orders: Arc<dyn OrderApi>, policy: PricePolicy) -> Self {
        Self {
            market,
            orders,
            policy,
        }
    }

    /// Validate and submit an order.
    ///
    /// Validation failures surface before any network call; a venue refusal
    /// comes back as `OrderRejected` carrying the response verbatim. Blind
    /// retry of a trade risks duplicate execution, so neither path retries.
    pub async fn execute(&self, request: OrderRequest) -> Result<OrderResult> {
        request.validate()?;

        tracing::info!(
            "Placing {} {} {} on {}",
            request.order_type.as_str(),
            request.side,
            request
                .quantity
                .or(request.quote_quantity)
                .unwrap_or_default(),
            request.symbol
        );

        self.orders.place_order(&request).await
    }

    /// Limit order with an optional explicit price.
    ///
    /// With no price, the current quote is fetched and the policy derives
    /// one from the touch on the order's own side.
    pub async fn place_limit(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<OrderResult> {
        let price = match price {
            Some(price) => price,
            None => {
                let quote = self.market.quote(symbol).await?;
                let derived = self.policy.default_limit_price(side, &quote);
                tracing::debug!("Derived limit price {} for {} {}", derived, side, symbol);
                derived
            }
        };

        self.execute(OrderRequest::limit(symbol, side, quantity, price))
            .await
    }

    /// Market buy spending a quote-asset amount (e.g. USDT)
    pub async fn market_buy(&self, symbol: &str, quote_quantity: Decimal) -> Result<OrderResult> {
        self.execute(OrderRequest::market_buy_quote(symbol, quote_quantity))
            .await
    }

    /// Market sell of a base-asset quantity
    pub async fn market_sell(&self, symbol: &str, quantity: Decimal) -> Result<OrderResult> {
        self.execute(OrderRequest::market(symbol, Side::Sell, quantity))
            .await
    }
}
