//! Error types for lead delivery.

use std::time::Duration;

use slopgpt_core::SlopError;

/// Failure of a single channel attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("channel task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for ChannelError {
    fn from(err: reqwest::Error) -> Self {
        ChannelError::Transport(err.to_string())
    }
}

/// Errors surfaced by lead intake.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("Name and email are required")]
    MissingRequiredFields,
    #[error("dead-letter spool failed: {0}")]
    DeadLetter(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<LeadError> for SlopError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::MissingRequiredFields => SlopError::Validation(err.to_string()),
            LeadError::DeadLetter(e) => SlopError::Io(e),
            LeadError::Serialization(e) => SlopError::Serialization(e.to_string()),
            LeadError::Client(msg) => SlopError::Config(msg),
        }
    }
}
