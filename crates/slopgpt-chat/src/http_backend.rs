//! [`ChatBackend`] over HTTP, speaking to a running SlopGPT server.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use slopgpt_core::{ConversationTurn, LeadAcknowledgment, LeadRecord};

use crate::error::ChatError;
use crate::session::ChatBackend;
use crate::types::ConversationReply;

#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ChatError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Transport(format!("{} returned {}: {}", path, status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| ChatError::Transport(format!("invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn converse(&self, turns: &[ConversationTurn]) -> Result<ConversationReply, ChatError> {
        self.post("/api/chat", &json!({ "messages": turns })).await
    }

    async fn submit_lead(&self, lead: &LeadRecord) -> Result<LeadAcknowledgment, ChatError> {
        let body = serde_json::to_value(lead)
            .map_err(|e| ChatError::Transport(format!("cannot encode lead: {}", e)))?;
        self.post("/api/lead", &body).await
    }
}
