//! Text-generation backend abstraction.

use async_trait::async_trait;
use slopgpt_core::ConversationTurn;

use crate::error::ChatError;

/// A single generation call: persona, transcript, and output cap.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub turns: Vec<ConversationTurn>,
    pub max_tokens: u32,
}

/// Hosted model that turns a transcript into the next assistant reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the next assistant reply. Returns the first text segment.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ChatError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}
