use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::chat::ChatMessage;
use crate::config::ChatConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const HTTP_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 6;
const API_KEY_PREFIX: &str = "sk-ant-";

#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatMessage],
}

impl ChatClient {
    pub fn new(config: &ChatConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;
        let http = Client::builder()
            .user_agent(concat!("vpp-matcher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn from_env(config: &ChatConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .with_context(|| format!("{} is not set", config.api_key_env))?;
        Self::new(config, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String> {
        if messages.is_empty() {
            return Err(anyhow!("conversation has no messages"));
        }
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages,
        };
        let response = self
            .http
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("failed POST request: {}", self.base_url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {}", self.base_url))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(anyhow!("POST {} returned {status}: {preview}", self.base_url));
        }
        let payload: Value = serde_json::from_str(&body)
            .with_context(|| format!("invalid JSON response: {}", self.base_url))?;
        extract_text(&payload)
    }
}

pub fn validate_api_key(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("chat API key is empty"));
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(anyhow!("chat API key must start with {API_KEY_PREFIX}"));
    }
    Ok(())
}

pub fn extract_text(payload: &Value) -> Result<String> {
    let blocks = payload
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("response has no content blocks"))?;
    let text = blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<String>();
    if text.is_empty() {
        return Err(anyhow!("response contained no text"));
    }
    Ok(text)
}
