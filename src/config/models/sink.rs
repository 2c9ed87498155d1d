//! Sink configuration

use super::*;
use serde::{Deserialize, Serialize};

/// One sink target descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Line-per-event stream on stdout
    Console(ConsoleSinkConfig),
    /// Relational table with fixed columns and an overflow blob
    Database(DatabaseSinkConfig),
}

impl SinkConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Console(_) => "console",
            Self::Database(_) => "database",
        }
    }
}

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleFormat {
    #[default]
    Text,
    Json,
}

/// Console sink configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleSinkConfig {
    #[serde(default)]
    pub format: ConsoleFormat,
    /// Append the property bag to text lines
    #[serde(default)]
    pub include_properties: bool,
}

/// Database sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSinkConfig {
    /// Connection URL (`sqlite://...` or `postgres://...`)
    pub url: String,
    /// Table name
    #[serde(default = "default_table_name")]
    pub table: String,
    /// Create the table at startup if it does not exist
    #[serde(default = "default_true")]
    pub auto_create_table: bool,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Retries after a failed insert
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Maximum lengths of string columns
    #[serde(default)]
    pub column_limits: ColumnLimits,
}

impl Default for DatabaseSinkConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/logs.db?mode=rwc".to_string(),
            table: default_table_name(),
            auto_create_table: true,
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            column_limits: ColumnLimits::default(),
        }
    }
}

/// Maximum lengths, in characters, of the string columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnLimits {
    pub correlation_id: usize,
    pub request_id: usize,
    pub user_id: usize,
    pub service_name: usize,
    pub environment: usize,
    pub request_path: usize,
    #[serde(rename = "ClientIP")]
    pub client_ip: usize,
    pub user_agent: usize,
    pub operation_name: usize,
}

impl Default for ColumnLimits {
    fn default() -> Self {
        Self {
            correlation_id: default_column_length(),
            request_id: default_column_length(),
            user_id: default_column_length(),
            service_name: default_column_length(),
            environment: default_column_length(),
            request_path: default_path_length(),
            client_ip: default_column_length(),
            user_agent: default_column_length(),
            operation_name: default_column_length(),
        }
    }
}

impl ColumnLimits {
    /// Every limit paired with its column name
    pub fn entries(&self) -> [(&'static str, usize); 9] {
        [
            ("CorrelationId", self.correlation_id),
            ("RequestId", self.request_id),
            ("UserId", self.user_id),
            ("ServiceName", self.service_name),
            ("Environment", self.environment),
            ("RequestPath", self.request_path),
            ("ClientIP", self.client_ip),
            ("UserAgent", self.user_agent),
            ("OperationName", self.operation_name),
        ]
    }
}
