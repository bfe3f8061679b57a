//! Anthropic Messages API client (non-streaming).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::{CompletionRequest, ModelClient};
use pharmscope_core::{Error, Result};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Non-streaming client for the Anthropic Messages API.
pub struct AnthropicClient {
    client: Client,
    model: String,
}

impl AnthropicClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
        }
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "system": request.system,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens,
        });

        debug!("Requesting completion from {} ({})", MESSAGES_URL, self.model);

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &request.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Model(format!("API error {}: {}", status, body)));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Model(format!("Bad response body: {}", e)))?;

        // Concatenate the text content blocks.
        let text = payload["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Model("Empty completion".into()));
        }

        Ok(text)
    }
}
