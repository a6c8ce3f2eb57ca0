use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medcompanion::api::router;
use medcompanion::api::types::ApiContext;
use medcompanion::auth::InMemoryIdentity;
use medcompanion::catalog::Catalog;
use medcompanion::chat::ChatEngine;
use medcompanion::config::{self, AppConfig};
use medcompanion::engine::ResponseEngine;
use medcompanion::llm::GeminiClient;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("MedCompanion starting v{}", config::APP_VERSION);

    // Environment preconditions are fatal: misconfigured deployments must
    // fail before binding the listener.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let backend = GeminiClient::new(&config.api_key, &config.chat_model);
    let ctx = ApiContext::new(
        ResponseEngine::new(Catalog::builtin()),
        ChatEngine::new(Arc::new(backend)),
        Arc::new(InMemoryIdentity::new()),
        &config.chat_model,
    );

    let app = router::app(ctx, config.site_dir.as_deref());

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %config.bind_addr, model = %config.chat_model, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
