//! Application state shared across all route handlers.
//!
//! Everything here is immutable after startup, so handlers only clone
//! `Arc`s.

use std::sync::Arc;
use std::time::Instant;

use dealbot_core::config::DealbotConfig;

use crate::catalog::Catalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<DealbotConfig>,
    /// Products served by `/search`.
    pub catalog: Arc<Catalog>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: DealbotConfig, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            start_time: Instant::now(),
        }
    }
}
