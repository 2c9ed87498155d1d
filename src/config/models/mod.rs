//! Configuration data models
//!
//! This module defines all configuration structures used by the pipeline.

pub mod pipeline;
pub mod server;
pub mod sink;

// Re-export all configuration types
pub use pipeline::*;
pub use server::*;
pub use sink::*;

pub fn default_service_name() -> String {
    "scopelog".to_string()
}

pub fn default_environment() -> String {
    "Production".to_string()
}

pub fn default_operation_name() -> Option<String> {
    Some("UnknownOperation".to_string())
}

pub fn default_queue_capacity() -> usize {
    10_000
}

pub fn default_shutdown_timeout_ms() -> u64 {
    5_000
}

pub fn default_table_name() -> String {
    "Logs".to_string()
}

pub fn default_max_connections() -> u32 {
    5
}

pub fn default_connection_timeout() -> u64 {
    30
}

pub fn default_max_retries() -> u32 {
    3
}

pub fn default_retry_backoff_ms() -> u64 {
    100
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_diagnostics_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

/// Default maximum length for string columns
pub fn default_column_length() -> usize {
    256
}

/// Default maximum length for the request path column
pub fn default_path_length() -> usize {
    500
}
