//! Shared types for the API layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::IdentityProvider;
use crate::chat::ChatEngine;
use crate::context::ConversationContext;
use crate::engine::ResponseEngine;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<ResponseEngine>,
    pub chat: Arc<ChatEngine>,
    /// Conversation state for the demo page. One shared context; the demo
    /// deployment serves a single interactive session at a time.
    pub demo: Arc<Mutex<ConversationContext>>,
    pub identity: Arc<dyn IdentityProvider>,
    pub chat_model: String,
}

impl ApiContext {
    pub fn new(
        engine: ResponseEngine,
        chat: ChatEngine,
        identity: Arc<dyn IdentityProvider>,
        chat_model: &str,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            chat: Arc::new(chat),
            demo: Arc::new(Mutex::new(ConversationContext::new())),
            identity,
            chat_model: chat_model.to_string(),
        }
    }
}

/// Authenticated session context, injected into request extensions by the
/// session middleware after token validation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub email: String,
    pub token: String,
}
