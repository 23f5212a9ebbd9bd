//! Transactional email delivered through a Resend-compatible API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use slopgpt_core::LeadRecord;

use crate::channel::{check_status, ChannelReceipt, ChannelRole, LeadChannel};
use crate::error::ChannelError;
use crate::format::{email_html, email_subject, email_text};

#[derive(Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: String,
    html: String,
}

#[derive(Default, Deserialize)]
struct SendEmailResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Emails a formatted lead summary to a fixed recipient.
pub struct EmailChannel {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl EmailChannel {
    pub fn new(http: reqwest::Client, api_base: &str, api_key: &str, from: &str, to: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/emails", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[async_trait]
impl LeadChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn role(&self) -> ChannelRole {
        ChannelRole::Fallback
    }

    async fn deliver(&self, lead: &LeadRecord) -> Result<ChannelReceipt, ChannelError> {
        let message = SendEmail {
            from: &self.from,
            to: &self.to,
            subject: email_subject(lead),
            text: email_text(lead),
            html: email_html(lead),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;

        // A 2xx means the provider accepted the message; the id is optional.
        let parsed: SendEmailResponse = if body.trim().is_empty() {
            SendEmailResponse::default()
        } else {
            serde_json::from_str(&body).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Email response is not JSON, ignoring body");
                SendEmailResponse::default()
            })
        };

        Ok(ChannelReceipt {
            reference: parsed.id,
            ..ChannelReceipt::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_email_sends_summary() {
        let router = Router::new().route(
            "/emails",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer re_123");
                assert_eq!(body["to"], "leads@slopgpt.com");
                assert_eq!(body["from"], "SlopGPT <noreply@slopgpt.com>");
                assert_eq!(body["subject"], "New Lead: Jane - Event Inquiry");
                assert!(body["text"].as_str().unwrap().contains("Email: jane@x.com"));
                assert!(body["html"].as_str().unwrap().contains("<table>"));
                Json(json!({"id": "email_1"}))
            }),
        );
        let base = spawn_stub(router).await;
        let channel = EmailChannel::new(
            reqwest::Client::new(),
            &base,
            "re_123",
            "SlopGPT <noreply@slopgpt.com>",
            "leads@slopgpt.com",
        );

        let receipt = channel
            .deliver(&LeadRecord::new("Jane", "jane@x.com"))
            .await
            .unwrap();
        assert_eq!(receipt.reference.as_deref(), Some("email_1"));
    }

    #[tokio::test]
    async fn test_email_rejected_key() {
        let router = Router::new().route(
            "/emails",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let base = spawn_stub(router).await;
        let channel = EmailChannel::new(reqwest::Client::new(), &base, "bad", "a@b.c", "d@e.f");

        let err = channel
            .deliver(&LeadRecord::new("Jane", "jane@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_email_accepted_without_json_body() {
        let router = Router::new()
            .route("/emails", post(|| async { StatusCode::OK }))
            .route("/plain/emails", post(|| async { "queued" }));
        let base = spawn_stub(router).await;

        for endpoint in [base.clone(), format!("{base}/plain")] {
            let channel =
                EmailChannel::new(reqwest::Client::new(), &endpoint, "re_123", "a@b.c", "d@e.f");
            let receipt = channel
                .deliver(&LeadRecord::new("Jane", "jane@x.com"))
                .await
                .unwrap();
            assert_eq!(receipt.reference, None);
        }
    }
}
