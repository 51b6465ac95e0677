//! Bullseye Trader
//!
//! An LLM-driven periodic trading bot for Binance spot markets.

use bullseye_trader::{
    client::{AccountClient, Credentials, MarketDataClient, OrderClient},
    config::Config,
    engine::{DecisionEngine, LlmClient},
    executor::{OrderExecutor, PricePolicy},
    notify::Notifier,
    trader::TradingLoop,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bullseye-trader")]
#[command(about = "LLM-driven periodic trading bot for Binance spot markets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trading loop
    Run {
        /// Report decisions without submitting orders
        #[arg(long)]
        dry_run: bool,
    },
    /// Show nonzero account balances
    Balances,
    /// Show the 24h market snapshot for a symbol
    Price { symbol: String },
    /// Show the best bid/ask for a symbol
    Quote { symbol: String },
    /// Show recent candles for a symbol
    Candles {
        symbol: String,
        #[arg(short, long, default_value = "1d")]
        interval: String,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Ask the reasoning service for a decision without executing it
    Decide {
        /// Single symbol; omit to analyze the configured universe
        symbol: Option<String>,
    },
    /// Test Telegram notification
    TestNotify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run { dry_run } => run_bot(config, dry_run).await,
        Commands::Balances => show_balances(config).await,
        Commands::Price { symbol } => show_price(config, &symbol).await,
        Commands::Quote { symbol } => show_quote(config, &symbol).await,
        Commands::Candles {
            symbol,
            interval,
            limit,
        } => show_candles(config, &symbol, &interval, limit).await,
        Commands::Decide { symbol } => show_decision(config, symbol.as_deref()).await,
        Commands::TestNotify => test_notify(config).await,
    }
}

async fn run_bot(config: Config, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!("Starting Bullseye trader");

    if dry_run {
        tracing::warn!("Running in DRY RUN mode - no orders will be submitted");
    }

    let notifier = if let Some(tg) = &config.telegram {
        Notifier::new(tg.bot_token.clone(), tg.chat_id.clone())
    } else {
        tracing::warn!("Telegram not configured, notifications disabled");
        Notifier::disabled()
    };

    if let Err(e) = notifier.startup(dry_run).await {
        tracing::warn!("Failed to send startup notification: {}", e);
    }

    // Credential/signer faults are fatal: nothing can be authenticated.
    let credentials = Credentials::load(&config.binance)?;
    let base_url = config.binance.base_url();

    let market = Arc::new(MarketDataClient::new(base_url)?);
    let account = Arc::new(AccountClient::new(base_url, credentials.clone())?);
    let orders = Arc::new(OrderClient::new(base_url, credentials)?);
    let model = Arc::new(LlmClient::from_config(&config.llm)?);

    let engine = DecisionEngine::new(
        market.clone(),
        account,
        model,
        config.trading.symbols.clone(),
    );
    let executor = OrderExecutor::new(market, orders, PricePolicy::from_config(&config.trading));

    let trading_loop = TradingLoop::new(
        engine,
        executor,
        notifier,
        Duration::from_secs(config.trading.interval_secs),
        dry_run,
    );

    trading_loop.run().await?;
    Ok(())
}

async fn show_balances(config: Config) -> anyhow::Result<()> {
    let credentials = Credentials::load(&config.binance)?;
    let account = AccountClient::new(config.binance.base_url(), credentials)?;

    let balances = account.balances().await?;
    if balances.is_empty() {
        println!("No nonzero balances");
        return Ok(());
    }

    println!("{:<10} {:>20} {:>20}", "Asset", "Free", "Locked");
    for (asset, balance) in balances {
        println!("{:<10} {:>20} {:>20}", asset, balance.free, balance.locked);
    }
    Ok(())
}

async fn show_price(config: Config, symbol: &str) -> anyhow::Result<()> {
    let market = MarketDataClient::new(config.binance.base_url())?;
    // Last traded price is fresher than the 24h ticker's lastPrice
    let price = market.last_price(symbol).await?;
    let snapshot = market.snapshot(symbol).await?;

    println!("{}", snapshot.symbol);
    println!("  Price:      {}", price);
    println!("  24h Change: {}%", snapshot.price_change_pct);
    println!("  24h High:   {}", snapshot.high_24h);
    println!("  24h Low:    {}", snapshot.low_24h);
    println!("  24h Volume: {}", snapshot.volume_24h);
    Ok(())
}

async fn show_quote(config: Config, symbol: &str) -> anyhow::Result<()> {
    let market = MarketDataClient::new(config.binance.base_url())?;
    let quote = market.quote(symbol).await?;

    println!("{}", quote.symbol);
    println!("  Bid: {} ({})", quote.bid_price, quote.bid_qty);
    println!("  Ask: {} ({})", quote.ask_price, quote.ask_qty);
    println!("  Spread: {} ({}%)", quote.spread(), quote.spread_pct());
    Ok(())
}

async fn show_candles(
    config: Config,
    symbol: &str,
    interval: &str,
    limit: u32,
) -> anyhow::Result<()> {
    let market = MarketDataClient::new(config.binance.base_url())?;
    let candles = market.candles(symbol, interval, limit, None, None).await?;

    println!(
        "{:<22} {:>14} {:>14} {:>14} {:>14} {:>16}",
        "Open time", "Open", "High", "Low", "Close", "Volume"
    );
    for candle in candles {
        println!(
            "{:<22} {:>14} {:>14} {:>14} {:>14} {:>16}",
            candle.open_time.format("%Y-%m-%d %H:%M"),
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume
        );
    }
    Ok(())
}

async fn show_decision(config: Config, symbol: Option<&str>) -> anyhow::Result<()> {
    let credentials = Credentials::load(&config.binance)?;
    let base_url = config.binance.base_url();

    let market = Arc::new(MarketDataClient::new(base_url)?);
    let account = Arc::new(AccountClient::new(base_url, credentials)?);
    let model = Arc::new(LlmClient::from_config(&config.llm)?);
    let engine = DecisionEngine::new(market, account, model, config.trading.symbols.clone());

    for symbol in engine.symbols_for(symbol) {
        match engine.decide(&symbol).await {
            Ok(decision) => println!("{}: {}", symbol, decision.to_json()),
            Err(e) => println!("{}: Error: {}", symbol, e),
        }
    }
    Ok(())
}

async fn test_notify(config: Config) -> anyhow::Result<()> {
    let tg = config
        .telegram
        .ok_or_else(|| anyhow::anyhow!("telegram is not configured"))?;

    let notifier = Notifier::new(tg.bot_token, tg.chat_id);
    notifier.send("🎯 Test notification from bullseye-trader").await?;
    println!("Notification sent");
    Ok(())
}
