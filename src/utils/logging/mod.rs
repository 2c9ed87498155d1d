//! Diagnostic logging for the pipeline itself
//!
//! The pipeline reports on its own health (dropped events, sink failures,
//! shutdown progress) through `tracing`. This is separate from the events it
//! delivers to sinks.

use crate::config::DiagnosticsConfig;
use crate::utils::error::{PipelineError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter; `RUST_LOG` wins over the configured level
pub fn env_filter(config: &DiagnosticsConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            PipelineError::Config(format!(
                "Invalid diagnostics level '{}': {}",
                config.level, e
            ))
        }),
    }
}

/// Install the global subscriber, writing to stderr so it never interleaves
/// with the console sink on stdout
pub fn init_tracing(config: &DiagnosticsConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| PipelineError::Config(format!("Failed to initialize tracing: {}", e)))
}
