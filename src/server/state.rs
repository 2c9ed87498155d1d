//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::LoggingPipeline;
use std::sync::Arc;

/// HTTP server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration (shared read-only)
    pub config: Arc<Config>,
    /// Logging pipeline
    pub pipeline: LoggingPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: LoggingPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
