//! Demo page endpoints: simulated pill recognition and the keyword-rule
//! chat that follows it.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::chat::StatusResponse;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::catalog::MedicationRecord;

#[derive(Serialize)]
pub struct UploadResponse {
    pub medication: MedicationRecord,
    /// Recognition summary, already recorded in the conversation.
    pub message: String,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub response: String,
}

/// `POST /api/demo/upload` — run the simulated recognition flow. Picks a
/// catalog medication after the fixed analysis delay and binds it to the
/// demo conversation.
pub async fn upload(State(ctx): State<ApiContext>) -> Json<UploadResponse> {
    let mut demo = ctx.demo.lock().await;
    let record = ctx.engine.recognize(&mut demo).await;

    // The recognizer appends its summary as the latest assistant message.
    let message = demo
        .history()
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_default();

    tracing::info!(medication = %record.name, "demo recognition completed");
    Json(UploadResponse {
        medication: record,
        message,
    })
}

/// `POST /api/demo/message` — answer one demo chat message from the rule
/// table, against whatever medication is currently recognized.
pub async fn message(
    State(ctx): State<ApiContext>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }

    let mut demo = ctx.demo.lock().await;
    let response = ctx.engine.reply(&req.message, &demo);
    demo.push_user(&req.message);
    demo.push_assistant(&response);

    Ok(Json(MessageResponse { response }))
}

/// `POST /api/demo/reset` — forget the recognized medication. The chat
/// transcript stays; only the binding resets.
pub async fn reset(State(ctx): State<ApiContext>) -> Json<StatusResponse> {
    ctx.demo.lock().await.reset();
    Json(StatusResponse {
        status: "success",
        message: "Demo session reset",
    })
}
