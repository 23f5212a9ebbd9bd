//! Generic outbound webhook carrying the lead plus a timestamp and source tag.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use slopgpt_core::LeadRecord;

use crate::channel::{check_status, ChannelReceipt, ChannelRole, LeadChannel};
use crate::error::ChannelError;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(flatten)]
    lead: &'a LeadRecord,
    timestamp: String,
    source: &'a str,
}

pub struct WebhookChannel {
    http: reqwest::Client,
    url: String,
    source: String,
}

impl WebhookChannel {
    pub fn new(http: reqwest::Client, url: &str, source: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
            source: source.to_string(),
        }
    }
}

#[async_trait]
impl LeadChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn role(&self) -> ChannelRole {
        ChannelRole::SideChannel
    }

    async fn deliver(&self, lead: &LeadRecord) -> Result<ChannelReceipt, ChannelError> {
        let payload = WebhookPayload {
            lead,
            timestamp: Utc::now().to_rfc3339(),
            source: &self.source,
        };
        let response = self.http.post(&self.url).json(&payload).send().await?;
        check_status(response).await?;
        Ok(ChannelReceipt::default())
    }
}
