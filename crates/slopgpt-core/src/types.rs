//! Shared data model: conversation turns, lead records, and the
//! qualification state tracked alongside a conversation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, SlopError};

// =============================================================================
// Conversation
// =============================================================================

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a visitor conversation. Ordered oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Render a transcript as `role: content` lines.
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lead-qualification progress of a conversation.
///
/// Progress only moves forward:
/// Gathering -> Confirming -> ContactRequested -> Complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Gathering,
    Confirming,
    ContactRequested,
    Complete,
}

impl ConversationState {
    /// Whether moving from `self` to `to` is allowed. Staying put is allowed.
    pub fn can_advance_to(self, to: ConversationState) -> bool {
        to >= self
    }

    /// Advance to `to` if it is not a step backwards, otherwise keep `self`.
    pub fn advance(self, to: ConversationState) -> ConversationState {
        if self.can_advance_to(to) {
            to
        } else {
            self
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationState::Gathering => "gathering",
            ConversationState::Confirming => "confirming",
            ConversationState::ContactRequested => "contact_requested",
            ConversationState::Complete => "complete",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Leads
// =============================================================================

/// Visitor-submitted contact and event details.
///
/// Only `name` and `email` are required; nothing else is format-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    #[serde(default, deserialize_with = "text_only", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_only", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub conversation_summary: Option<String>,
}

impl LeadRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Reject the record unless both `name` and `email` are non-blank.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.name) || is_blank(&self.email) {
            return Err(SlopError::Validation(
                "Name and email are required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    /// Labelled fields in display order, with placeholder text for blanks.
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name().to_string()),
            ("Email", self.email().to_string()),
            ("Phone", or_placeholder(&self.phone, "Not provided")),
            ("Event Type", or_placeholder(&self.event_type, "Not specified")),
            ("Theme/Concept", or_placeholder(&self.theme, "Not specified")),
            ("Date", or_placeholder(&self.date, "Not specified")),
            ("Guest Count", or_placeholder(&self.guest_count, "Not specified")),
            ("Location", or_placeholder(&self.location, "Not specified")),
            ("Budget", or_placeholder(&self.budget, "Not discussed")),
        ]
    }
}

/// Visitor-facing reply to a lead submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadAcknowledgment {
    pub success: bool,
    pub message: String,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Field value, or `placeholder` when absent or blank.
pub fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Accept free-text fields sent as any JSON scalar (e.g. `"guestCount": 50`).
/// Arrays and objects are kept as their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Keep string values only. Anything else reads as absent, so a non-string
/// `name` or `email` fails [`LeadRecord::validate`] instead of parsing.
fn text_only<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
