//! OpenAI-compatible chat-completions client
//!
//! Works against any provider exposing the `/v1/chat/completions` shape;
//! the response is constrained to a single JSON object via
//! `response_format`.

use super::ReasoningModel;
use crate::config::LlmConfig;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl LlmClient {
    /// Resolve provider defaults from config.
    ///
    /// "compatible"/"custom" requires an explicit model and base_url.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let (base_url, model) = match config.provider.to_lowercase().as_str() {
            "openai" | "gpt" => (
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "https://api.openai.com".to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| "gpt-4o".to_string()),
            ),
            "deepseek" => (
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "https://api.deepseek.com".to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| "deepseek-chat".to_string()),
            ),
            "ollama" => (
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:11434".to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| "qwen2.5:14b".to_string()),
            ),
            "compatible" | "custom" => {
                let base_url = config.base_url.clone().ok_or_else(|| {
                    BotError::Config("compatible provider requires base_url".into())
                })?;
                let model = config.model.clone().ok_or_else(|| {
                    BotError::Config("compatible provider requires model".into())
                })?;
                (base_url, model)
            }
            other => {
                return Err(BotError::Config(format!(
                    "unknown LLM provider {:?}",
                    other
                )));
            }
        };

        Ok(Self {
            http: Client::new(),
            api_key: config.api_key.clone(),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReasoningModel for LlmClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let mut req = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("content-type", "application/json");

        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = req.json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::DecisionParse(format!(
                "reasoning service HTTP {}: {}",
                status, body
            )));
        }

        let value: serde_json::Value = resp.json().await?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| BotError::DecisionParse("empty reasoning response".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
