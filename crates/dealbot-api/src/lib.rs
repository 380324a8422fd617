//! dealbot API crate - the mock product search provider.
//!
//! Serves a static product catalog over HTTP: a plain-text liveness check,
//! a JSON health check, and the `/search` endpoint consumed by the chat
//! client.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use catalog::Catalog;
pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
