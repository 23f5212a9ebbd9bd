//! Error types for the conversational interface.

use slopgpt_core::SlopError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("messages array must not be empty")]
    EmptyTranscript,
    #[error("message {0} has empty content")]
    EmptyTurn(usize),
    #[error("text generation failed: {0}")]
    Backend(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("text generation returned no text")]
    EmptyReply,
}

impl ChatError {
    /// Whether the caller sent a bad transcript, as opposed to a downstream failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatError::EmptyTranscript | ChatError::EmptyTurn(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

impl From<ChatError> for SlopError {
    fn from(err: ChatError) -> Self {
        if err.is_validation() {
            SlopError::Validation(err.to_string())
        } else {
            SlopError::Upstream(err.to_string())
        }
    }
}
