//! Pipeline configuration

use super::*;
use crate::core::event::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Service name stamped on every event
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Deployment environment label
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Host identity; detected from the environment when absent
    #[serde(default)]
    pub host: Option<String>,
    /// Events below this level are discarded
    #[serde(default = "default_minimum_level")]
    pub minimum_level: LogLevel,
    /// Per-source minimum levels, keyed by `SourceContext` prefix
    #[serde(default)]
    pub level_overrides: HashMap<String, LogLevel>,
    /// Operation name for requests that never narrow it; null omits the field
    #[serde(default = "default_operation_name")]
    pub default_operation_name: Option<String>,
    /// Per-sink queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// How long shutdown waits for queues to drain
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
    /// Configured sinks
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

fn default_minimum_level() -> LogLevel {
    LogLevel::Information
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            host: None,
            minimum_level: default_minimum_level(),
            level_overrides: HashMap::new(),
            default_operation_name: default_operation_name(),
            queue_capacity: default_queue_capacity(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            sinks: vec![SinkConfig::Console(ConsoleSinkConfig::default())],
        }
    }
}

impl PipelineConfig {
    /// Minimum level for an event from `source`; the longest matching prefix wins
    pub fn minimum_level_for(&self, source: Option<&str>) -> LogLevel {
        source
            .and_then(|source| {
                self.level_overrides
                    .iter()
                    .filter(|(prefix, _)| source.starts_with(prefix.as_str()))
                    .max_by_key(|(prefix, _)| prefix.len())
                    .map(|(_, level)| *level)
            })
            .unwrap_or(self.minimum_level)
    }

    /// Resolved host identity
    pub fn host_name(&self) -> String {
        self.host
            .clone()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(crate::core::event::Enricher::detect_host)
    }

    pub fn shutdown_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.shutdown_timeout_ms)
    }
}
