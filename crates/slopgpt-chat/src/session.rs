//! Visitor-side chat session.
//!
//! Holds the visible transcript, calls the conversation endpoint on each
//! submission, decides when to open the contact form, and submits the lead.
//! Every call takes `&mut self`, so a session never has two requests in
//! flight at once.

use std::time::Duration;

use async_trait::async_trait;
use slopgpt_core::config::ChatConfig;
use slopgpt_core::{
    render_transcript, ConversationState, ConversationTurn, LeadAcknowledgment, LeadRecord,
};

use crate::detector::ContactDetector;
use crate::error::ChatError;
use crate::persona::{fallback_message, thanks_message, GREETING};
use crate::types::ConversationReply;

/// Transport to the conversation and lead endpoints.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn converse(&self, turns: &[ConversationTurn]) -> Result<ConversationReply, ChatError>;

    async fn submit_lead(&self, lead: &LeadRecord) -> Result<LeadAcknowledgment, ChatError>;
}

/// Result of [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The assistant replied. `contact_form_after` is set when the reply
    /// asked for contact details and the form should open after that delay.
    Replied { contact_form_after: Option<Duration> },
    /// The backend failed; the fallback message was appended.
    Fallback,
}

/// Result of [`ChatSession::submit_lead`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Name or email missing; nothing was sent.
    MissingFields,
    /// The lead was accepted and the closing message appended.
    Accepted(LeadAcknowledgment),
    /// Submission failed; the form stays open for another try.
    Failed,
}

pub struct ChatSession<B> {
    backend: B,
    detector: ContactDetector,
    transcript: Vec<ConversationTurn>,
    state: ConversationState,
    contact_email: String,
    form_delay: Duration,
    form_open: bool,
    lead_submitted: bool,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B, config: &ChatConfig) -> Self {
        Self {
            backend,
            detector: ContactDetector::default(),
            transcript: vec![ConversationTurn::assistant(GREETING)],
            state: ConversationState::Gathering,
            contact_email: config.contact_email.clone(),
            form_delay: Duration::from_millis(config.contact_form_delay_ms),
            form_open: false,
            lead_submitted: false,
        }
    }

    /// Visible transcript, greeting included.
    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn lead_submitted(&self) -> bool {
        self.lead_submitted
    }

    /// Show the contact form. No-op once a lead was submitted.
    pub fn open_contact_form(&mut self) {
        if !self.lead_submitted {
            self.form_open = true;
        }
    }

    pub fn dismiss_contact_form(&mut self) {
        self.form_open = false;
    }

    /// Append a visitor message and fetch the assistant's reply.
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        self.transcript.push(ConversationTurn::user(text));

        // The greeting is local to the widget and never sent.
        let outgoing = &self.transcript[1..];
        let reply = match self.backend.converse(outgoing).await {
            Ok(reply) if !reply.message.trim().is_empty() => reply,
            Ok(_) => {
                tracing::warn!("Conversation endpoint returned an empty message");
                return self.push_fallback();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Conversation request failed");
                return self.push_fallback();
            }
        };

        let wants_contact = self.detector.requests_contact(&reply.message);
        self.state = self.state.advance(reply.state);
        if wants_contact {
            self.state = self.state.advance(ConversationState::ContactRequested);
        }
        self.transcript.push(ConversationTurn::assistant(reply.message));

        let contact_form_after = (wants_contact && !self.lead_submitted).then_some(self.form_delay);
        SendOutcome::Replied { contact_form_after }
    }

    /// Submit the contact form, attaching the full transcript.
    pub async fn submit_lead(&mut self, mut form: LeadRecord) -> SubmitOutcome {
        if form.validate().is_err() {
            return SubmitOutcome::MissingFields;
        }
        form.conversation_summary = Some(render_transcript(&self.transcript));

        match self.backend.submit_lead(&form).await {
            Ok(ack) if ack.success => {
                self.lead_submitted = true;
                self.form_open = false;
                self.state = self.state.advance(ConversationState::Complete);
                self.transcript
                    .push(ConversationTurn::assistant(thanks_message(form.name(), form.email())));
                SubmitOutcome::Accepted(ack)
            }
            Ok(ack) => {
                tracing::warn!(message = %ack.message, "Lead endpoint did not accept the lead");
                SubmitOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Lead submission failed");
                SubmitOutcome::Failed
            }
        }
    }

    fn push_fallback(&mut self) -> SendOutcome {
        self.transcript
            .push(ConversationTurn::assistant(fallback_message(&self.contact_email)));
        SendOutcome::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slopgpt_core::Role;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend replaying scripted replies and recording what it was sent.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<ConversationReply, ChatError>>>,
        sent: Mutex<Vec<Vec<ConversationTurn>>>,
        leads: Mutex<Vec<LeadRecord>>,
        lead_fails: bool,
    }

    impl ScriptedBackend {
        fn with_replies(replies: Vec<Result<&str, ChatError>>) -> Self {
            let replies = replies
                .into_iter()
                .map(|r| {
                    r.map(|m| ConversationReply {
                        message: m.to_string(),
                        state: ConversationState::Gathering,
                    })
                })
                .collect();
            Self {
                replies: Mutex::new(replies),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl<'a> ChatBackend for &'a ScriptedBackend {
        async fn converse(
            &self,
            turns: &[ConversationTurn],
        ) -> Result<ConversationReply, ChatError> {
            self.sent.lock().unwrap().push(turns.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ChatError::Transport("no more replies".into())))
        }

        async fn submit_lead(&self, lead: &LeadRecord) -> Result<LeadAcknowledgment, ChatError> {
            self.leads.lock().unwrap().push(lead.clone());
            if self.lead_fails {
                return Err(ChatError::Transport("connection reset".into()));
            }
            Ok(LeadAcknowledgment {
                success: true,
                message: "Thank you! Our team will be in touch within 24 hours.".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_session_starts_with_greeting() {
        let backend = ScriptedBackend::default();
        let session = ChatSession::new(&backend, &ChatConfig::default());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].content, GREETING);
        assert_eq!(session.state(), ConversationState::Gathering);
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let backend = ScriptedBackend::default();
        let mut session = ChatSession::new(&backend, &ChatConfig::default());
        assert_eq!(session.send("   ").await, SendOutcome::Ignored);
        assert!(backend.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_excludes_greeting_and_appends_reply() {
        let backend = ScriptedBackend::with_replies(vec![Ok("Rawr! How many guests?")]);
        let mut session = ChatSession::new(&backend, &ChatConfig::default());

        let outcome = session.send("plan a dinosaur party").await;
        assert_eq!(
            outcome,
            SendOutcome::Replied {
                contact_form_after: None
            }
        );

        let sent = backend.sent.lock().unwrap();
        assert_eq!(sent[0], vec![ConversationTurn::user("plan a dinosaur party")]);

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].role, Role::Assistant);
        assert_eq!(transcript[2].content, "Rawr! How many guests?");
    }

    #[tokio::test]
    async fn test_contact_cue_schedules_form_after_delay() {
        let backend =
            ScriptedBackend::with_replies(vec![Ok("Could I get your name and email?")]);
        let mut session = ChatSession::new(&backend, &ChatConfig::default());

        let outcome = session.send("yes that's all correct").await;
        assert_eq!(
            outcome,
            SendOutcome::Replied {
                contact_form_after: Some(Duration::from_millis(1000))
            }
        );
        assert_eq!(session.state(), ConversationState::ContactRequested);
        assert!(!session.is_form_open());
        session.open_contact_form();
        assert!(session.is_form_open());
    }

    #[tokio::test]
    async fn test_backend_error_appends_fallback() {
        let backend =
            ScriptedBackend::with_replies(vec![Err(ChatError::Transport("refused".into()))]);
        let mut session = ChatSession::new(&backend, &ChatConfig::default());

        assert_eq!(session.send("hello").await, SendOutcome::Fallback);
        let last = session.transcript().last().unwrap();
        assert!(last.content.contains("hello@slopgpt.com"));
        assert_eq!(session.transcript()[1].content, "hello");
    }

    #[tokio::test]
    async fn test_empty_reply_appends_fallback() {
        let backend = ScriptedBackend::with_replies(vec![Ok("")]);
        let mut session = ChatSession::new(&backend, &ChatConfig::default());
        assert_eq!(session.send("hello").await, SendOutcome::Fallback);
    }

    #[tokio::test]
    async fn test_submit_lead_requires_name_and_email() {
        let backend = ScriptedBackend::default();
        let mut session = ChatSession::new(&backend, &ChatConfig::default());
        let mut form = LeadRecord::default();
        form.name = Some("Jane".into());
        assert_eq!(session.submit_lead(form).await, SubmitOutcome::MissingFields);
        assert!(backend.leads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_lead_attaches_transcript_and_closes_form() {
        let backend =
            ScriptedBackend::with_replies(vec![Ok("Great! What's your name and email?")]);
        let mut session = ChatSession::new(&backend, &ChatConfig::default());
        session.send("birthday for 50").await;
        session.open_contact_form();

        let outcome = session
            .submit_lead(LeadRecord::new("Jane Doe", "jane@x.com"))
            .await;
        assert!(matches!(outcome, SubmitOutcome::Accepted(_)));
        assert!(!session.is_form_open());
        assert!(session.lead_submitted());
        assert_eq!(session.state(), ConversationState::Complete);

        let leads = backend.leads.lock().unwrap();
        let summary = leads[0].conversation_summary.as_deref().unwrap();
        assert!(summary.starts_with("assistant: Hey there!"));
        assert!(summary.contains("\nuser: birthday for 50\n"));

        let last = session.transcript().last().unwrap();
        assert!(last.content.starts_with("Thanks Jane Doe!"));

        // A submitted lead suppresses further forms.
        session.open_contact_form();
        assert!(!session.is_form_open());
    }

    #[tokio::test]
    async fn test_submit_lead_failure_keeps_form_open() {
        let backend = ScriptedBackend {
            lead_fails: true,
            ..Default::default()
        };
        let mut session = ChatSession::new(&backend, &ChatConfig::default());
        session.open_contact_form();
        let before = session.transcript().len();

        let outcome = session
            .submit_lead(LeadRecord::new("Jane", "jane@x.com"))
            .await;
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(session.is_form_open());
        assert_eq!(session.transcript().len(), before);
    }
}
