//! Error types for the trading bot

use thiserror::Error;

/// All errors the bot can produce
#[derive(Error, Debug)]
pub enum BotError {
    /// Key material fault. Fatal: nothing can be authenticated.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Venue rejected the signature or timestamp.
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// Venue returned a non-success status on a data read.
    #[error("Market data error: {0}")]
    MarketData(String),

    /// Malformed order request, caught before any network call.
    #[error("Invalid order: {0}")]
    Validation(String),

    /// Venue refused the order. Payload passed through verbatim, never retried.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Reasoning service returned an unparseable or invalid decision.
    #[error("Decision parse error: {0}")]
    DecisionParse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;
