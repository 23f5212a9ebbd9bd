//! Lead intake: validate, fan out, acknowledge.

use std::sync::Arc;
use std::time::Duration;

use slopgpt_core::config::LeadConfig;
use slopgpt_core::{LeadAcknowledgment, LeadRecord};
use tracing::Instrument;
use uuid::Uuid;

use crate::channel::{build_channels, LeadChannel};
use crate::dead_letter::DeadLetterSpool;
use crate::dispatcher::{DeliveryReport, LeadDispatcher};
use crate::error::LeadError;

/// Outcome of an accepted submission.
#[derive(Debug, Clone)]
pub struct LeadOutcome {
    /// Correlates this submission across log lines and the dead-letter spool.
    pub lead_id: Uuid,
    pub acknowledgment: LeadAcknowledgment,
    pub report: DeliveryReport,
}

pub struct LeadIntake {
    dispatcher: LeadDispatcher,
    dead_letter: Option<DeadLetterSpool>,
    acknowledgment: String,
}

impl LeadIntake {
    pub fn new(
        dispatcher: LeadDispatcher,
        dead_letter: Option<DeadLetterSpool>,
        acknowledgment: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            dead_letter,
            acknowledgment: acknowledgment.into(),
        }
    }

    /// Build the intake and its channels from configuration.
    pub fn from_config(config: &LeadConfig) -> Result<Self, LeadError> {
        let timeout = Duration::from_secs(config.channel_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LeadError::Client(e.to_string()))?;

        let channels = build_channels(config, http);
        if channels.is_empty() {
            tracing::warn!("No lead channels configured; leads will only be logged");
        }

        let dead_letter = config
            .dead_letter_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(DeadLetterSpool::new);

        Ok(Self::new(
            LeadDispatcher::new(channels, timeout),
            dead_letter,
            config.acknowledgment.clone(),
        ))
    }

    /// Intake with an explicit channel list.
    pub fn with_channels(
        channels: Vec<Arc<dyn LeadChannel>>,
        timeout: Duration,
        acknowledgment: impl Into<String>,
    ) -> Self {
        Self::new(LeadDispatcher::new(channels, timeout), None, acknowledgment)
    }

    pub fn with_dead_letter(mut self, spool: DeadLetterSpool) -> Self {
        self.dead_letter = Some(spool);
        self
    }

    /// Validate and deliver a lead.
    ///
    /// Only a missing name or email is an error. Channel failures never are:
    /// the visitor is acknowledged even when nothing downstream accepted the
    /// lead, in which case it is logged and spooled for manual follow-up.
    pub async fn submit(&self, lead: LeadRecord) -> Result<LeadOutcome, LeadError> {
        lead.validate().map_err(|_| LeadError::MissingRequiredFields)?;

        let lead_id = Uuid::new_v4();
        tracing::info!(
            lead_id = %lead_id,
            name = %lead.name(),
            email = %lead.email(),
            event_type = ?lead.event_type,
            "Lead received"
        );

        let report = self
            .dispatcher
            .dispatch(&lead)
            .instrument(tracing::info_span!("lead", id = %lead_id))
            .await;

        if let Some(priority) = report.priority() {
            tracing::info!(lead_id = %lead_id, priority = %priority, "Lead prioritized");
        }

        if !report.delivered_any() {
            let payload = serde_json::to_string(&lead)?;
            tracing::error!(
                lead_id = %lead_id,
                attempts = report.attempts.len(),
                lead = %payload,
                "Lead was not delivered to any channel"
            );
            if let Some(spool) = &self.dead_letter {
                // A spool failure must not turn into a visitor-facing error.
                if let Err(e) = spool.append(lead_id, &lead, &report).await {
                    tracing::error!(error = %e, "Failed to write dead-letter record");
                }
            }
        }

        let message = report
            .acknowledgment_override()
            .map(str::to_string)
            .unwrap_or_else(|| self.acknowledgment.clone());

        Ok(LeadOutcome {
            lead_id,
            acknowledgment: LeadAcknowledgment {
                success: true,
                message,
            },
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelReceipt, ChannelRole};
    use crate::error::ChannelError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ACK: &str = "Thank you! Our team will be in touch within 24 hours.";

    struct CountingChannel {
        succeed: bool,
        receipt: ChannelReceipt,
        calls: AtomicUsize,
    }

    impl CountingChannel {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                succeed,
                receipt: ChannelReceipt::default(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LeadChannel for CountingChannel {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn role(&self) -> ChannelRole {
            ChannelRole::Primary
        }

        async fn deliver(&self, _lead: &LeadRecord) -> Result<ChannelReceipt, ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(self.receipt.clone())
            } else {
                Err(ChannelError::Transport("connection refused".into()))
            }
        }
    }

    fn intake(channel: Arc<CountingChannel>) -> LeadIntake {
        LeadIntake::with_channels(
            vec![channel as Arc<dyn LeadChannel>],
            Duration::from_secs(1),
            ACK,
        )
    }

    #[tokio::test]
    async fn test_submit_delivers_and_acknowledges() {
        let channel = CountingChannel::new(true);
        let outcome = intake(channel.clone())
            .submit(LeadRecord::new("Jane Doe", "jane@x.com"))
            .await
            .unwrap();

        assert!(outcome.acknowledgment.success);
        assert_eq!(outcome.acknowledgment.message, ACK);
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
        assert!(outcome.report.delivered_any());
    }

    #[tokio::test]
    async fn test_submit_missing_email_reaches_no_channel() {
        let channel = CountingChannel::new(true);
        let mut lead = LeadRecord::default();
        lead.name = Some("Jane".into());
        lead.email = Some("  ".into());

        let err = intake(channel.clone()).submit(lead).await.unwrap_err();
        assert!(matches!(err, LeadError::MissingRequiredFields));
        assert_eq!(channel.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_acknowledges_when_every_channel_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead.jsonl");
        let intake =
            intake(CountingChannel::new(false)).with_dead_letter(DeadLetterSpool::new(&path));

        let outcome = intake
            .submit(LeadRecord::new("Jane", "jane@x.com"))
            .await
            .unwrap();
        assert!(outcome.acknowledgment.success);
        assert!(!outcome.report.delivered_any());

        let spooled = std::fs::read_to_string(&path).unwrap();
        assert_eq!(spooled.lines().count(), 1);
        assert!(spooled.contains("jane@x.com"));
    }

    #[tokio::test]
    async fn test_submit_without_channels_still_acknowledges() {
        let intake = LeadIntake::with_channels(Vec::new(), Duration::from_secs(1), ACK);
        let outcome = intake
            .submit(LeadRecord::new("Jane", "jane@x.com"))
            .await
            .unwrap();
        assert_eq!(outcome.acknowledgment.message, ACK);
    }

    #[tokio::test]
    async fn test_receipt_acknowledgment_overrides_default() {
        let channel = Arc::new(CountingChannel {
            succeed: true,
            receipt: ChannelReceipt {
                acknowledgment: Some("A planner will call you today!".into()),
                ..ChannelReceipt::default()
            },
            calls: AtomicUsize::new(0),
        });
        let outcome = intake(channel)
            .submit(LeadRecord::new("Jane", "jane@x.com"))
            .await
            .unwrap();
        assert_eq!(outcome.acknowledgment.message, "A planner will call you today!");
    }

    #[tokio::test]
    async fn test_duplicate_submissions_are_each_delivered() {
        let channel = CountingChannel::new(true);
        let intake = intake(channel.clone());
        let mut ids = Vec::new();
        for _ in 0..2 {
            let outcome = intake
                .submit(LeadRecord::new("Jane", "jane@x.com"))
                .await
                .unwrap();
            ids.push(outcome.lead_id);
        }
        assert_eq!(channel.calls.load(Ordering::SeqCst), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_from_config_defaults() {
        let intake = LeadIntake::from_config(&LeadConfig::default()).unwrap();
        assert_eq!(intake.dispatcher.channel_count(), 0);
        assert!(intake.dead_letter.is_none());
        assert_eq!(intake.acknowledgment, ACK);
    }

    #[test]
    fn test_from_config_with_spool_and_channels() {
        let config = LeadConfig {
            chatops_webhook_url: Some("https://example.com/slack".into()),
            dead_letter_path: Some("/tmp/slopgpt/dead.jsonl".into()),
            ..LeadConfig::default()
        };
        let intake = LeadIntake::from_config(&config).unwrap();
        assert_eq!(intake.dispatcher.channel_count(), 1);
        assert_eq!(
            intake.dead_letter.as_ref().unwrap().path(),
            std::path::Path::new("/tmp/slopgpt/dead.jsonl")
        );
    }
}
