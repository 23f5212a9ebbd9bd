//! Phrase heuristics over assistant replies.
//!
//! The assistant signals qualification progress only through its prose, so
//! these matchers infer it: whether a reply asks for contact details, and
//! whether it is summarizing for confirmation.

use slopgpt_core::{ConversationState, ConversationTurn, Role};

/// Phrases that mark a reply as a request for contact details.
const CONTACT_PHRASES: &[&str] = &["reach out", "get in touch", "i've got everything"];

/// Word pairs that mark a contact request only when both appear.
const CONTACT_PAIRS: &[(&str, &str)] = &[("email", "name")];

/// Phrases that mark a reply as a summary awaiting confirmation.
const CONFIRM_PHRASES: &[&str] = &[
    "does that sound right",
    "does that look right",
    "is that correct",
    "is that right",
    "did i get that right",
    "to confirm",
    "just to recap",
    "to recap",
    "let me summarize",
    "here's what i have",
];

/// Detects assistant replies that ask the visitor for contact details.
#[derive(Debug, Clone)]
pub struct ContactDetector {
    phrases: Vec<String>,
    pairs: Vec<(String, String)>,
}

impl Default for ContactDetector {
    fn default() -> Self {
        Self {
            phrases: CONTACT_PHRASES.iter().map(|p| p.to_string()).collect(),
            pairs: CONTACT_PAIRS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }
}

impl ContactDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a phrase that on its own triggers the contact form.
    pub fn with_phrase(mut self, phrase: &str) -> Self {
        self.phrases.push(phrase.to_lowercase());
        self
    }

    /// Whether `reply` asks for the visitor's contact details.
    pub fn requests_contact(&self, reply: &str) -> bool {
        let text = normalize(reply);
        self.pairs
            .iter()
            .any(|(a, b)| text.contains(a.as_str()) && text.contains(b.as_str()))
            || self.phrases.iter().any(|p| text.contains(p.as_str()))
    }
}

/// Classify a single assistant reply.
pub fn classify_reply(detector: &ContactDetector, reply: &str) -> ConversationState {
    if detector.requests_contact(reply) {
        return ConversationState::ContactRequested;
    }
    let text = normalize(reply);
    if CONFIRM_PHRASES.iter().any(|p| text.contains(p)) {
        ConversationState::Confirming
    } else {
        ConversationState::Gathering
    }
}

/// Fold the assistant turns of a transcript into a qualification state.
pub fn track_state(detector: &ContactDetector, turns: &[ConversationTurn]) -> ConversationState {
    turns
        .iter()
        .filter(|t| t.role == Role::Assistant)
        .fold(ConversationState::Gathering, |state, t| {
            state.advance(classify_reply(detector, &t.content))
        })
}

/// Lowercase and fold typographic apostrophes.
fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}
