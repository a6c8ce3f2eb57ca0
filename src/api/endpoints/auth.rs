//! Authentication endpoints.
//!
//! Sign-up and sign-in reject callers who already hold a live session; the
//! error body points them at the dashboard instead.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::chat::StatusResponse;
use crate::api::error::ApiError;
use crate::api::middleware::bearer_token;
use crate::api::types::ApiContext;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct WhoAmIResponse {
    pub email: String,
}

fn reject_if_signed_in(ctx: &ApiContext, headers: &HeaderMap) -> Result<(), ApiError> {
    if let Some(token) = bearer_token(headers) {
        if ctx.identity.session(&token).is_some() {
            return Err(ApiError::AlreadyAuthenticated);
        }
    }
    Ok(())
}

/// `POST /api/auth/sign-up`
pub async fn sign_up(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    reject_if_signed_in(&ctx, &headers)?;

    let session = ctx.identity.sign_up(&req.email, &req.password)?;
    Ok(Json(SessionResponse {
        token: session.token,
        email: session.email,
    }))
}

/// `POST /api/auth/sign-in`
pub async fn sign_in(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    reject_if_signed_in(&ctx, &headers)?;

    let session = ctx.identity.sign_in(&req.email, &req.password)?;
    Ok(Json(SessionResponse {
        token: session.token,
        email: session.email,
    }))
}

/// `POST /api/auth/sign-out` — idempotent; an unknown token is a no-op.
pub async fn sign_out(State(ctx): State<ApiContext>, headers: HeaderMap) -> Json<StatusResponse> {
    if let Some(token) = bearer_token(&headers) {
        ctx.identity.sign_out(&token);
    }
    Json(StatusResponse {
        status: "success",
        message: "Signed out",
    })
}

/// `GET /api/auth/session` — resolve the caller's session, if any.
pub async fn session(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<WhoAmIResponse>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
    let session = ctx.identity.session(&token).ok_or(ApiError::Unauthorized)?;
    Ok(Json(WhoAmIResponse {
        email: session.email,
    }))
}
