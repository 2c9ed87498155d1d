//! Configuration management for the pipeline
//!
//! This module handles loading, validation, and management of all configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::event::LogLevel;
use crate::utils::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Prefix of every recognized environment variable
pub const ENV_PREFIX: &str = "SCOPELOG_";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Diagnostic output of the pipeline itself
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse YAML without applying overrides or validating
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SCOPELOG_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(service_name) = var("SERVICE_NAME") {
            self.pipeline.service_name = service_name;
        }
        if let Some(environment) = var("ENVIRONMENT") {
            self.pipeline.environment = environment;
        }
        if let Some(host) = var("HOST_NAME") {
            self.pipeline.host = Some(host);
        }
        if let Some(level) = var("MINIMUM_LEVEL") {
            self.pipeline.minimum_level = level
                .parse::<LogLevel>()
                .map_err(PipelineError::Config)?;
        }
        if let Some(capacity) = var("QUEUE_CAPACITY") {
            self.pipeline.queue_capacity = capacity
                .parse()
                .map_err(|e| PipelineError::Config(format!("Invalid queue capacity: {}", e)))?;
        }
        if let Some(timeout) = var("SHUTDOWN_TIMEOUT_MS") {
            self.pipeline.shutdown_timeout_ms = timeout
                .parse()
                .map_err(|e| PipelineError::Config(format!("Invalid shutdown timeout: {}", e)))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            let existing = self.pipeline.sinks.iter_mut().find_map(|sink| match sink {
                SinkConfig::Database(db) => Some(db),
                _ => None,
            });
            match existing {
                Some(db) => db.url = url,
                None => self.pipeline.sinks.push(SinkConfig::Database(DatabaseSinkConfig {
                    url,
                    ..Default::default()
                })),
            }
        }
        if let Some(host) = var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| PipelineError::Config(format!("Invalid port: {}", e)))?;
        }
        if let Some(level) = var("DIAGNOSTICS_LEVEL") {
            self.diagnostics.level = level;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.pipeline.check_section("Pipeline")?;
        self.server.check_section("Server")?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
