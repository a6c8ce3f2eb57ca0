//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! API routes are nested under `/api/`; the health check and the static
//! site (when configured) live at the root.
//!
//! Handlers use `State<ApiContext>`; the session middleware reads the same
//! context through `Extension<ApiContext>`, injected as the outermost layer.

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the application router.
pub fn app(ctx: ApiContext, site_dir: Option<&Path>) -> Router {
    // Protected routes — require a live session
    let protected = Router::new()
        .route("/chat", post(endpoints::chat::send))
        .route("/medication-info", post(endpoints::chat::medication_info))
        .route("/clear-history", post(endpoints::chat::clear_history))
        .route("/stats", get(endpoints::chat::stats))
        .route("/demo/upload", post(endpoints::demo::upload))
        .route("/demo/message", post(endpoints::demo::message))
        .route("/demo/reset", post(endpoints::demo::reset))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::require_session))
        // Extension must be outermost so the middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    // Auth routes — establish or tear down the session themselves
    let auth = Router::new()
        .route("/auth/sign-up", post(endpoints::auth::sign_up))
        .route("/auth/sign-in", post(endpoints::auth::sign_in))
        .route("/auth/sign-out", post(endpoints::auth::sign_out))
        .route("/auth/session", get(endpoints::auth::session))
        .with_state(ctx.clone());

    let mut router = Router::new()
        .route("/health", get(endpoints::health::check))
        .nest("/api", protected)
        .nest("/api", auth)
        .layer(CorsLayer::permissive());

    if let Some(dir) = site_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}
