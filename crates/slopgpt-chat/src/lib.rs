//! Conversational lead qualification for SlopGPT.
//!
//! Provides the assistant persona, the text-generation backend and its
//! Anthropic Messages implementation, the server-side conversation
//! service, contact-request detection, and the visitor-side chat session
//! that drives the HTTP endpoints.

pub mod anthropic;
pub mod detector;
pub mod error;
pub mod generator;
pub mod http_backend;
pub mod persona;
pub mod service;
pub mod session;
pub mod types;

pub use anthropic::AnthropicClient;
pub use detector::{classify_reply, track_state, ContactDetector};
pub use error::ChatError;
pub use generator::{GenerationRequest, TextGenerator};
pub use http_backend::HttpBackend;
pub use service::ConversationService;
pub use session::{ChatBackend, ChatSession, SendOutcome, SubmitOutcome};
pub use types::{ConversationReply, ConversationRequest};
