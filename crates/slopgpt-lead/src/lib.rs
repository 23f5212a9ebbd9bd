//! Lead intake and delivery for SlopGPT.
//!
//! A validated lead is fanned out to the configured notification channels
//! (chat-ops, workflow automation, transactional email, generic webhook).
//! Each attempt is isolated; the visitor always gets an acknowledgment,
//! and leads no channel accepted are spooled to a dead-letter file.

pub mod channel;
pub mod dead_letter;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod intake;

pub use channel::{build_channels, ChannelReceipt, ChannelRole, LeadChannel};
pub use dead_letter::DeadLetterSpool;
pub use dispatcher::{ChannelAttempt, ChannelOutcome, DeliveryReport, LeadDispatcher};
pub use error::{ChannelError, LeadError};
pub use intake::{LeadIntake, LeadOutcome};

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serve `router` on an ephemeral loopback port and return its base URL.
    pub async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
