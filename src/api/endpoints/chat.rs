//! Guard-railed AI chat endpoints.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::chat::ChatOutcome;
use crate::guardrails::QueryType;

const MAX_MESSAGE_LEN: usize = 1000;
const MAX_MEDICATION_NAME_LEN: usize = 200;

fn default_include_history() -> bool {
    true
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_include_history")]
    pub include_history: bool,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub query_type: QueryType,
    pub guardrail_decision: &'static str,
    pub is_refused: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatOutcome> for ChatResponse {
    fn from(outcome: ChatOutcome) -> Self {
        Self {
            response: outcome.response,
            query_type: outcome.query_type,
            guardrail_decision: outcome.guardrail_decision,
            is_refused: outcome.is_refused,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
pub struct MedicationInfoRequest {
    pub medication_name: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub conversation_length: usize,
    pub timestamp: DateTime<Utc>,
}

/// `POST /api/chat` — send one message through the guard-railed engine.
pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }
    if req.message.chars().count() > MAX_MESSAGE_LEN {
        return Err(ApiError::BadRequest(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LEN} characters"
        )));
    }

    let outcome = ctx.chat.chat(&req.message, req.include_history).await;
    tracing::info!(
        email = %session.email,
        query_type = outcome.query_type.as_str(),
        is_refused = outcome.is_refused,
        "chat message processed"
    );

    Ok(Json(outcome.into()))
}

/// `POST /api/medication-info` — structured overview of a named medication.
pub async fn medication_info(
    State(ctx): State<ApiContext>,
    Json(req): Json<MedicationInfoRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let name = req.medication_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Medication name cannot be empty".into()));
    }
    if name.chars().count() > MAX_MEDICATION_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "Medication name exceeds maximum length of {MAX_MEDICATION_NAME_LEN} characters"
        )));
    }

    let outcome = ctx.chat.medication_info(name).await;
    Ok(Json(outcome.into()))
}

/// `POST /api/clear-history`
pub async fn clear_history(State(ctx): State<ApiContext>) -> Json<StatusResponse> {
    ctx.chat.clear_history().await;
    Json(StatusResponse {
        status: "success",
        message: "Conversation history cleared",
    })
}

/// `GET /api/stats`
pub async fn stats(State(ctx): State<ApiContext>) -> Json<StatsResponse> {
    Json(StatsResponse {
        conversation_length: ctx.chat.history_len().await,
        timestamp: Utc::now(),
    })
}
