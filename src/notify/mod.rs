//! Telegram notification sink
//!
//! One text message per completed cycle. When Telegram is not configured
//! the notifier runs disabled and messages only hit the log.

use crate::error::{BotError, Result};
use reqwest::Client;
use serde::Serialize;

#[derive(Clone)]
pub struct Notifier {
    http: Client,
    bot_token: String,
    chat_id: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            chat_id,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            bot_token: String::new(),
            chat_id: String::new(),
            enabled: false,
        }
    }

    pub async fn send(&self, text: &str) -> Result<()> {
        if !self.enabled {
            tracing::debug!("Notifier disabled, dropping message:\n{}", text);
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let request = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
        };

        let resp = self.http.post(&url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::Notify(format!("HTTP {}: {}", status, body)));
        }
        Ok(())
    }

    pub async fn startup(&self, dry_run: bool) -> Result<()> {
        let mode = if dry_run { " (dry run)" } else { "" };
        self.send(&format!("🤖 Bullseye trader started{}", mode)).await
    }

    /// Combined per-symbol report for one cycle
    pub async fn cycle_report(&self, report: &str) -> Result<()> {
        self.send(report).await
    }
}
