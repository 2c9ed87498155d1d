//! Pipeline configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating pipeline configuration");

        if self.service_name.trim().is_empty() {
            return Err("Service name cannot be empty".to_string());
        }

        if self.environment.trim().is_empty() {
            return Err("Environment cannot be empty".to_string());
        }

        if self.queue_capacity == 0 {
            return Err("Queue capacity must be greater than 0".to_string());
        }

        if let Some(name) = &self.default_operation_name {
            if name.trim().is_empty() {
                return Err(
                    "Default operation name cannot be empty; use null to omit it".to_string(),
                );
            }
        }

        if self.sinks.is_empty() {
            return Err("At least one sink must be configured".to_string());
        }

        for (index, sink) in self.sinks.iter().enumerate() {
            sink.validate()
                .map_err(|e| format!("Sink #{} ({}): {}", index, sink.kind(), e))?;
        }

        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        Ok(())
    }
}
