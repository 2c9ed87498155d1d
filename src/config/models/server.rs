//! Server and diagnostics configuration

use super::*;
use serde::{Deserialize, Serialize};

/// HTTP server configuration for the demo binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the pipeline's own diagnostic output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_diagnostics_level")]
    pub level: String,
    /// Emit diagnostics as JSON
    #[serde(default)]
    pub json: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: default_diagnostics_level(),
            json: false,
        }
    }
}
