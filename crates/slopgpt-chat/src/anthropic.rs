//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use slopgpt_core::config::ChatConfig;

use crate::error::ChatError;
use crate::generator::{GenerationRequest, TextGenerator};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// [`TextGenerator`] backed by the hosted Messages endpoint.
#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ChatError> {
        if self.api_key.is_empty() {
            return Err(ChatError::Backend("API key not configured".to_string()));
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: request
                .turns
                .iter()
                .map(|t| WireMessage {
                    role: t.role.as_str(),
                    content: &t.content,
                })
                .collect(),
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Backend(format!("status {}: {}", status, text)));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Backend(format!("invalid response body: {}", e)))?;

        // Only the first block counts; a non-text first block yields no text.
        Ok(parsed
            .content
            .into_iter()
            .next()
            .filter(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
