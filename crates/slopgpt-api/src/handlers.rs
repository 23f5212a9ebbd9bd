//! Route handlers.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use slopgpt_chat::{ConversationReply, ConversationRequest};
use slopgpt_core::{LeadAcknowledgment, LeadRecord};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /api/chat - next assistant reply for the visitor's transcript.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ConversationReply>, ApiError> {
    let request: ConversationRequest = parse_body(body).map_err(|e| match e {
        BodyError::TooLarge => ApiError::PayloadTooLarge,
        BodyError::Invalid(reason) => {
            tracing::debug!(error = %reason, "Rejected chat body");
            ApiError::BadRequest("Messages array required".to_string())
        }
    })?;
    let turns = request
        .messages
        .ok_or_else(|| ApiError::BadRequest("Messages array required".to_string()))?;

    let reply = state.conversation.respond(&turns).await?;
    Ok(Json(reply))
}

/// POST /api/lead - accept a lead and fan it out to the notification channels.
///
/// A valid lead is always acknowledged with 200, whatever the channels did.
pub async fn lead(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<LeadAcknowledgment>, ApiError> {
    let lead: LeadRecord = parse_body(body).map_err(|e| match e {
        BodyError::TooLarge => ApiError::PayloadTooLarge,
        BodyError::Invalid(reason) => {
            tracing::error!(error = %reason, "Could not parse lead body");
            ApiError::Internal("Failed to submit lead".to_string())
        }
    })?;

    let outcome = state.intake.submit(lead).await?;
    tracing::debug!(
        lead_id = %outcome.lead_id,
        delivered = outcome.report.delivered_count(),
        attempted = outcome.report.attempts.len(),
        "Lead acknowledged"
    );
    Ok(Json(outcome.acknowledgment))
}

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Fallback for any method other than POST on the API endpoints.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// =============================================================================
// Body parsing
// =============================================================================

enum BodyError {
    TooLarge,
    Invalid(String),
}

/// Decode a JSON body regardless of its `Content-Type` header.
fn parse_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, BodyError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!(error = %rejection, "Request body over limit");
            BodyError::TooLarge
        } else {
            BodyError::Invalid(rejection.to_string())
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|e| BodyError::Invalid(e.to_string()))
}
