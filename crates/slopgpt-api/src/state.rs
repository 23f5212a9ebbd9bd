//! Shared state handed to every route handler.

use std::sync::Arc;
use std::time::Instant;

use slopgpt_chat::ConversationService;
use slopgpt_core::SlopConfig;
use slopgpt_lead::LeadIntake;

/// Cloned per request; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SlopConfig>,
    pub conversation: ConversationService,
    pub intake: Arc<LeadIntake>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: SlopConfig, conversation: ConversationService, intake: LeadIntake) -> Self {
        Self {
            config: Arc::new(config),
            conversation,
            intake: Arc::new(intake),
            start_time: Instant::now(),
        }
    }
}
