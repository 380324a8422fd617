//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, and the endpoint
//! handlers.

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use dealbot_core::error::DealbotError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// CORS is open to any origin: the chat client may be served from
/// anywhere.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/search", get(handlers::search))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address and serve until the task is dropped.
pub async fn start_server(state: AppState) -> Result<(), DealbotError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DealbotError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Backend running on http://{}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| DealbotError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
