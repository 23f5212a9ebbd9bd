//! Fan-out of a lead across the configured channels.
//!
//! Primary channels are tried in order, the fallback only when none of them
//! delivered, then side channels. Every attempt runs in its own task under a
//! timeout, so a hung or panicking channel cannot affect the others.

use std::sync::Arc;
use std::time::Duration;

use slopgpt_core::LeadRecord;

use crate::channel::{ChannelReceipt, ChannelRole, LeadChannel};
use crate::error::ChannelError;

/// Result of one channel attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Delivered(ChannelReceipt),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone)]
pub struct ChannelAttempt {
    pub channel: &'static str,
    pub role: ChannelRole,
    pub outcome: ChannelOutcome,
}

impl ChannelAttempt {
    pub fn delivered(&self) -> bool {
        matches!(self.outcome, ChannelOutcome::Delivered(_))
    }

    fn receipt(&self) -> Option<&ChannelReceipt> {
        match &self.outcome {
            ChannelOutcome::Delivered(receipt) => Some(receipt),
            _ => None,
        }
    }
}

/// Per-channel outcomes of one dispatch, in attempt order.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub attempts: Vec<ChannelAttempt>,
}

impl DeliveryReport {
    /// Whether any channel accepted the lead.
    pub fn delivered_any(&self) -> bool {
        self.attempts.iter().any(ChannelAttempt::delivered)
    }

    pub fn delivered_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.delivered()).count()
    }

    /// Channels that were tried and failed, as `(name, reason)`.
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                ChannelOutcome::Failed(reason) => Some((a.channel, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// First acknowledgment supplied by a delivering channel.
    pub fn acknowledgment_override(&self) -> Option<&str> {
        self.attempts
            .iter()
            .filter_map(ChannelAttempt::receipt)
            .find_map(|r| r.acknowledgment.as_deref())
    }

    /// First priority classification supplied by a delivering channel.
    pub fn priority(&self) -> Option<&str> {
        self.attempts
            .iter()
            .filter_map(ChannelAttempt::receipt)
            .find_map(|r| r.priority.as_deref())
    }

    fn primary_delivered(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| a.role == ChannelRole::Primary && a.delivered())
    }
}

#[derive(Clone)]
pub struct LeadDispatcher {
    channels: Vec<Arc<dyn LeadChannel>>,
    timeout: Duration,
}

impl LeadDispatcher {
    pub fn new(channels: Vec<Arc<dyn LeadChannel>>, timeout: Duration) -> Self {
        Self { channels, timeout }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Deliver `lead` to every applicable channel and report each outcome.
    pub async fn dispatch(&self, lead: &LeadRecord) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for channel in self.with_role(ChannelRole::Primary) {
            let attempt = self.attempt(channel, lead).await;
            report.attempts.push(attempt);
        }

        let fallback_needed = !report.primary_delivered();
        for channel in self.with_role(ChannelRole::Fallback) {
            let attempt = if fallback_needed {
                self.attempt(channel, lead).await
            } else {
                tracing::debug!(channel = channel.name(), "Fallback skipped");
                ChannelAttempt {
                    channel: channel.name(),
                    role: ChannelRole::Fallback,
                    outcome: ChannelOutcome::Skipped("primary channel delivered".to_string()),
                }
            };
            report.attempts.push(attempt);
        }

        for channel in self.with_role(ChannelRole::SideChannel) {
            let attempt = self.attempt(channel, lead).await;
            report.attempts.push(attempt);
        }

        report
    }

    fn with_role(&self, role: ChannelRole) -> impl Iterator<Item = &Arc<dyn LeadChannel>> {
        self.channels.iter().filter(move |c| c.role() == role)
    }

    async fn attempt(&self, channel: &Arc<dyn LeadChannel>, lead: &LeadRecord) -> ChannelAttempt {
        let name = channel.name();
        let role = channel.role();

        let task = {
            let channel = Arc::clone(channel);
            let lead = lead.clone();
            tokio::spawn(async move { channel.deliver(&lead).await })
        };

        let result = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ChannelError::Aborted(join_err.to_string())),
            // The detached task is dropped with its JoinHandle and keeps running
            // until the HTTP client's own timeout fires.
            Err(_) => Err(ChannelError::Timeout(self.timeout)),
        };

        let outcome = match result {
            Ok(receipt) => {
                tracing::info!(
                    channel = name,
                    reference = ?receipt.reference,
                    priority = ?receipt.priority,
                    "Lead delivered"
                );
                ChannelOutcome::Delivered(receipt)
            }
            Err(e) => {
                tracing::warn!(channel = name, error = %e, "Lead delivery failed");
                ChannelOutcome::Failed(e.to_string())
            }
        };

        ChannelAttempt {
            channel: name,
            role,
            outcome,
        }
    }
}
