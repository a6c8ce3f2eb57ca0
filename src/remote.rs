//! Client for the remote chat endpoint.
//!
//! The dashboard consumes the chat service as an opaque HTTP collaborator:
//! one POST, one JSON reply. Any transport or status failure collapses to a
//! single fixed apology; recovery is the user re-submitting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed user-facing message for any remote-chat failure.
pub const REMOTE_FAILURE_MESSAGE: &str =
    "I apologize, but I encountered an error. Please try again. If the problem \
     persists, contact support.";

const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, Error)]
pub enum RemoteChatError {
    #[error("Cannot reach the chat service at {0}")]
    Connection(String),
    #[error("Chat service returned status {0}")]
    Status(u16),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Failed to decode chat response: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
struct RemoteChatRequest<'a> {
    message: &'a str,
    include_history: bool,
}

/// Reply shape consumed from the chat endpoint. Extra fields the service
/// sends (query type, timestamps) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteChatReply {
    pub response: String,
    pub is_refused: bool,
}

/// Async HTTP client for the chat collaborator.
pub struct RemoteChatClient {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Send one message. No retries, default transport timeouts.
    pub async fn send(
        &self,
        message: &str,
        include_history: bool,
    ) -> Result<RemoteChatReply, RemoteChatError> {
        let url = format!("{}{CHAT_PATH}", self.base_url);
        let body = RemoteChatRequest {
            message,
            include_history,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                RemoteChatError::Connection(self.base_url.clone())
            } else {
                RemoteChatError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteChatError::Status(status.as_u16()));
        }

        response
            .json::<RemoteChatReply>()
            .await
            .map_err(|e| RemoteChatError::Decode(e.to_string()))
    }

    /// Send one message, collapsing every failure to the fixed apology.
    pub async fn send_or_apology(&self, message: &str, include_history: bool) -> RemoteChatReply {
        match self.send(message, include_history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "remote chat request failed");
                RemoteChatReply {
                    response: REMOTE_FAILURE_MESSAGE.to_string(),
                    is_refused: false,
                }
            }
        }
    }
}
