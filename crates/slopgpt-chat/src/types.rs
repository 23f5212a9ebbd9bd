//! Wire types for the conversation endpoint.

use serde::{Deserialize, Serialize};
use slopgpt_core::{ConversationState, ConversationTurn};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationRequest {
    #[serde(default)]
    pub messages: Option<Vec<ConversationTurn>>,
}

/// Successful reply from `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationReply {
    pub message: String,
    #[serde(default)]
    pub state: ConversationState,
}
