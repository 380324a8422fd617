//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query parameters via axum extractors, reads the
//! shared catalog, and returns a JSON (or plain-text) response.

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::Json;
use serde::{Deserialize, Serialize};

use dealbot_core::types::{Product, MAX_QUERY_LENGTH};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /`.
pub const ROOT_MESSAGE: &str = "✅ API is running!";

// =============================================================================
// Query parameter types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub catalog_size: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET / - plain-text liveness check.
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        catalog_size: state.catalog.len() as u64,
    })
}

/// GET /search - catalog products matching `q`.
///
/// Returns a bare JSON array; no matches is an empty array, not an error.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let q = params.q.unwrap_or_default();

    if q.chars().count() > MAX_QUERY_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Parameter 'q' must be at most {} characters",
            MAX_QUERY_LENGTH
        )));
    }

    let results = state.catalog.search(&q);
    tracing::debug!(query = %q, count = results.len(), "Search served");
    Ok(Json(results))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
