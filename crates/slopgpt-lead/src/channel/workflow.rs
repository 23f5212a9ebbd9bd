//! Workflow-automation webhook that stores the lead downstream.

use async_trait::async_trait;
use serde::Deserialize;
use slopgpt_core::LeadRecord;

use crate::channel::{check_status, ChannelReceipt, ChannelRole, LeadChannel};
use crate::error::ChannelError;

/// Optional response body from the workflow.
#[derive(Debug, Default, Deserialize)]
struct WorkflowResponse {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Sends the raw lead to a workflow webhook (n8n, Make, Zapier, ...).
pub struct WorkflowChannel {
    http: reqwest::Client,
    url: String,
}

impl WorkflowChannel {
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl LeadChannel for WorkflowChannel {
    fn name(&self) -> &'static str {
        "workflow"
    }

    fn role(&self) -> ChannelRole {
        ChannelRole::Primary
    }

    async fn deliver(&self, lead: &LeadRecord) -> Result<ChannelReceipt, ChannelError> {
        let response = self.http.post(&self.url).json(lead).send().await?;
        let body = check_status(response).await?.text().await?;

        // Workflows often answer with an empty body or plain text.
        let parsed: WorkflowResponse = if body.trim().is_empty() {
            WorkflowResponse::default()
        } else {
            match serde_json::from_str(&body) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!(error = %e, "Workflow response is not JSON, ignoring body");
                    WorkflowResponse::default()
                }
            }
        };

        Ok(ChannelReceipt {
            reference: parsed.id.map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            priority: parsed.priority,
            acknowledgment: parsed.message.filter(|m| !m.trim().is_empty()),
        })
    }
}
