//! Chat-ops notification to a team channel.

use async_trait::async_trait;
use slopgpt_core::LeadRecord;

use crate::channel::{check_status, ChannelReceipt, ChannelRole, LeadChannel};
use crate::error::ChannelError;
use crate::format::chatops_payload;

/// Posts a structured summary to a Slack-compatible incoming webhook.
pub struct ChatOpsChannel {
    http: reqwest::Client,
    url: String,
}

impl ChatOpsChannel {
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl LeadChannel for ChatOpsChannel {
    fn name(&self) -> &'static str {
        "chatops"
    }

    fn role(&self) -> ChannelRole {
        ChannelRole::Primary
    }

    async fn deliver(&self, lead: &LeadRecord) -> Result<ChannelReceipt, ChannelError> {
        let response = self
            .http
            .post(&self.url)
            .json(&chatops_payload(lead))
            .send()
            .await?;
        check_status(response).await?;
        Ok(ChannelReceipt::default())
    }
}
