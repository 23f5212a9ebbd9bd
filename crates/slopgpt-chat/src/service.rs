//! Conversation service: validates a transcript, forwards it with the
//! persona to the text generator, and reports the qualification state.

use std::sync::Arc;

use slopgpt_core::config::ChatConfig;
use slopgpt_core::ConversationTurn;

use crate::detector::{classify_reply, track_state, ContactDetector};
use crate::error::ChatError;
use crate::generator::{GenerationRequest, TextGenerator};
use crate::persona::SYSTEM_PROMPT;
use crate::types::ConversationReply;

/// Stateless conversation handler core. The transcript the client resends
/// on each turn is the only conversation state.
#[derive(Clone)]
pub struct ConversationService {
    generator: Arc<dyn TextGenerator>,
    detector: ContactDetector,
    system_prompt: String,
    max_tokens: u32,
    max_reply_chars: usize,
}

impl ConversationService {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &ChatConfig) -> Self {
        Self {
            generator,
            detector: ContactDetector::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: config.max_tokens,
            max_reply_chars: config.max_reply_chars,
        }
    }

    /// Replace the persona. Used by tests and alternate deployments.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Check that a transcript is non-empty and every turn has content.
    pub fn validate(turns: &[ConversationTurn]) -> Result<(), ChatError> {
        if turns.is_empty() {
            return Err(ChatError::EmptyTranscript);
        }
        if let Some(idx) = turns.iter().position(|t| t.content.trim().is_empty()) {
            return Err(ChatError::EmptyTurn(idx));
        }
        Ok(())
    }

    /// Produce the next assistant reply for `turns`.
    pub async fn respond(&self, turns: &[ConversationTurn]) -> Result<ConversationReply, ChatError> {
        Self::validate(turns)?;

        let request = GenerationRequest {
            system: self.system_prompt.clone(),
            turns: turns.to_vec(),
            max_tokens: self.max_tokens,
        };

        let raw = self.generator.generate(&request).await?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyReply);
        }
        let message = truncate_chars(text, self.max_reply_chars);

        let state = track_state(&self.detector, turns)
            .advance(classify_reply(&self.detector, &message));

        tracing::debug!(
            backend = self.generator.name(),
            turns = turns.len(),
            reply_len = message.len(),
            state = %state,
            "Conversation reply generated"
        );

        Ok(ConversationReply { message, state })
    }
}

/// Cut `text` to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
