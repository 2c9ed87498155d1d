//! Error types for the logging pipeline

use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the pipeline
///
/// Only startup paths surface these to callers. Per-event failures are
/// counted by the dispatcher and reported through `tracing`.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid or missing configuration, fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single write attempt to one sink failed
    #[error("Sink '{sink}' write failed: {message}")]
    SinkWrite { sink: String, message: String },

    /// A scope frame was released out of order or never released
    #[error("Context imbalance: {0}")]
    ContextImbalance(String),

    /// A sink queue was saturated and the event was dropped
    #[error("Queue overflow on sink '{sink}'")]
    QueueOverflow { sink: String },

    /// The dispatcher has already been drained and closed
    #[error("Dispatcher shut down: {0}")]
    Shutdown(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
