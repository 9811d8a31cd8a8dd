// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Anthropic Messages API client used by the `/ask` endpoint.

use crate::config::Config;
use crate::error::{ExecError, ExecResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first content block.
    pub fn first_text(&self) -> ExecResult<&str> {
        self.content
            .first()
            .and_then(|block| block.text.as_deref())
            .ok_or_else(|| ExecError::Llm("response has no text content".to_string()))
    }
}

/// Thin client for a single-turn prompt.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.llm_api_url.clone(),
            api_key: config.anthropic_api_key.clone(),
            model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn request<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }

    /// Send `prompt` and return the reply text.
    pub async fn ask(&self, prompt: &str) -> ExecResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ExecError::Llm("ANTHROPIC_API_KEY not set".to_string()))?;

        debug!("Asking {} ({} chars)", self.model, prompt.len());
        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ Language model responded with status {}", status);
            return Err(ExecError::Llm(format!(
                "API responded with status: {}",
                status.as_u16()
            )));
        }

        let body: MessagesResponse = response.json().await?;
        Ok(body.first_text()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(api_key: Option<&str>) -> LlmClient {
        let key = api_key.map(str::to_string);
        let config = Config::from_lookup(move |name| {
            (name == "ANTHROPIC_API_KEY").then(|| key.clone()).flatten()
        })
        .unwrap();
        LlmClient::new(reqwest::Client::new(), &config)
    }

    #[test]
    fn request_body_shape() {
        let llm = client(Some("sk-test"));
        let body = serde_json::to_value(llm.request("swap 1 MON")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-3-sonnet-20240229",
                "max_tokens": 1000,
                "messages": [{ "role": "user", "content": "swap 1 MON" }]
            })
        );
    }

    #[test]
    fn reply_is_first_text_block() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "content": [
                { "type": "text", "text": "swap 2 MON to 0x..." },
                { "type": "text", "text": "ignored" }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().unwrap(), "swap 2 MON to 0x...");

        let empty: MessagesResponse = serde_json::from_value(json!({ "content": [] })).unwrap();
        assert!(matches!(empty.first_text(), Err(ExecError::Llm(_))));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let llm = client(None);
        assert!(!llm.is_configured());
        assert!(matches!(llm.ask("hello").await, Err(ExecError::Llm(_))));
    }
}
