//! Notification channel trait and the configured channel set.
//!
//! Defines the `LeadChannel` async trait and builds the ordered list of
//! channels enabled by configuration.

pub mod chatops;
pub mod email;
pub mod webhook;
pub mod workflow;

use std::sync::Arc;

use async_trait::async_trait;
use slopgpt_core::config::LeadConfig;
use slopgpt_core::LeadRecord;

use crate::error::ChannelError;

pub use chatops::ChatOpsChannel;
pub use email::EmailChannel;
pub use webhook::WebhookChannel;
pub use workflow::WorkflowChannel;

/// How a channel's outcome affects the rest of the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Attempted on every lead; any success counts as delivered.
    Primary,
    /// Attempted only when no primary channel delivered.
    Fallback,
    /// Attempted on every lead; never affects the fallback decision.
    SideChannel,
}

/// What a channel reported back after accepting a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelReceipt {
    /// Downstream record or message id.
    pub reference: Option<String>,
    /// Priority classification assigned downstream.
    pub priority: Option<String>,
    /// Replacement for the visitor-facing acknowledgment.
    pub acknowledgment: Option<String>,
}

/// A destination a lead can be delivered to.
#[async_trait]
pub trait LeadChannel: Send + Sync {
    /// Short channel name for logs and reports.
    fn name(&self) -> &'static str;

    fn role(&self) -> ChannelRole;

    async fn deliver(&self, lead: &LeadRecord) -> Result<ChannelReceipt, ChannelError>;
}

/// Build the channels enabled by `config`, in attempt order.
pub fn build_channels(config: &LeadConfig, http: reqwest::Client) -> Vec<Arc<dyn LeadChannel>> {
    let mut channels: Vec<Arc<dyn LeadChannel>> = Vec::new();

    if let Some(url) = configured(&config.chatops_webhook_url) {
        channels.push(Arc::new(ChatOpsChannel::new(http.clone(), url)));
    }
    if let Some(url) = configured(&config.workflow_webhook_url) {
        channels.push(Arc::new(WorkflowChannel::new(http.clone(), url)));
    }
    if let Some(key) = configured(&config.email_api_key) {
        channels.push(Arc::new(EmailChannel::new(
            http.clone(),
            &config.email_api_base,
            key,
            &config.email_from,
            &config.email_to,
        )));
    }
    if let Some(url) = configured(&config.generic_webhook_url) {
        channels.push(Arc::new(WebhookChannel::new(http, url, &config.source_tag)));
    }

    let names: Vec<&str> = channels.iter().map(|c| c.name()).collect();
    tracing::info!(channels = ?names, "Lead channels configured");
    channels
}

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Map a non-success response to [`ChannelError::Status`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ChannelError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ChannelError::Status { status, body })
}
