//! Periodic trading loop
//!
//! One cycle walks the symbol universe in order: decide, then execute
//! anything that is not a HOLD, then collect a report line. Cycles never
//! overlap: the timer tick awaits cycle completion, and an overrun fires
//! the next cycle immediately afterwards instead of concurrently. Stopping
//! takes effect before the next tick; an in-flight cycle always finishes,
//! since an order submission must not be left in an undetermined local
//! state.


use crate::engine::DecisionEngine;
use crate::error::Result;
use crate::executor::OrderExecutor;
use crate::notify::Notifier;
use crate::types::{OrderRequest, Side, TradeDecision};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub struct TradingLoop {
    engine: DecisionEngine,
    executor: OrderExecutor,
    notifier: Notifier,
    interval: Duration,
    dry_run: bool,
    /// Single-flight guard: set while a cycle is running
    cycle_active: AtomicBool,
    stop: AtomicBool,
}

impl TradingLoop {
    pub fn new(
        engine: DecisionEngine,
        executor: OrderExecutor,
        notifier: Notifier,
        interval: Duration,
        dry_run: bool,
    ) -> Self {
        Self {
            engine,
            executor,
            notifier,
            interval,
            dry_run,
            cycle_active: AtomicBool::new(false),
            stop: AtomicBool::new(false),
        }
    }

    /// Request the loop to end before its next tick
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Run cycles forever (or until `stop`), reporting each to the notifier
    pub async fn run(&self) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        // An overrunning cycle delays the next tick instead of stacking them
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Trading loop started: {:?} interval, universe {:?}",
            self.interval,
            self.engine.universe()
        );

        loop {
            ticker.tick().await;
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Trading loop stopped");
                return Ok(());
            }

            match self.run_cycle().await {
                Some(report) => {
                    if let Err(e) = self.notifier.cycle_report(&report).await {
                        tracing::warn!("Failed to deliver cycle report: {}", e);
                    }
                }
                None => tracing::warn!("Cycle skipped: previous cycle still running"),
            }
        }
    }

    /// Run one full cycle over the universe.
    ///
    /// Returns `None` if a cycle is already in flight. One symbol failing
    /// never aborts the rest; its line reports the error instead.
    pub async fn run_cycle(&self) -> Option<String> {
        if self
            .cycle_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let mut lines = Vec::new();
        for symbol in self.engine.universe().to_vec() {
            let line = match self.run_symbol(&symbol).await {
                Ok(line) => line,
                Err(e) => format!("{} - Error: {}", symbol, e),
            };
            lines.push(line);
        }

        self.cycle_active.store(false, Ordering::SeqCst);
        Some(lines.join("\n\n"))
    }

    async fn run_symbol(&self, symbol: &str) -> Result<String> {
        let decision = self.engine.decide(symbol).await?;

        match decision {
            TradeDecision::Buy {
                quantity,
                reasoning,
            } => {
                if self.dry_run {
                    return Ok(format!(
                        "{} - DRY RUN, would BUY {}. {}",
                        symbol, quantity, reasoning
                    ));
                }
                let result = self
                    .executor
                    .execute(OrderRequest::market(symbol, Side::Buy, quantity))
                    .await?;
                Ok(format!("{} - Executed BUY: {}", symbol, result))
            }
            TradeDecision::Sell {
                quantity,
                reasoning,
            } => {
                if self.dry_run {
                    return Ok(format!(
                        "{} - DRY RUN, would SELL {}. {}",
                        symbol, quantity, reasoning
                    ));
                }
                let result = self
                    .executor
                    .execute(OrderRequest::market(symbol, Side::Sell, quantity))
                    .await?;
                Ok(format!("{} - Executed SELL: {}", symbol, result))
            }
            TradeDecision::Hold { reasoning } => {
                Ok(format!("{} - Holding position. {}", symbol, reasoning))
            }
        }
    }
}
