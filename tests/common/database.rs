//! Test database utilities
//!
//! Provides in-memory SQLite log stores for testing without external dependencies.
//! Each call creates an isolated database.

use scopelog::config::DatabaseSinkConfig;
use scopelog::core::sinks::DatabaseSink;
use sea_orm::ConnectionTrait;
use std::sync::Arc;

/// Relational sink backed by an isolated in-memory SQLite database
#[derive(Clone)]
pub struct TestDatabase {
    inner: Arc<DatabaseSink>,
}

impl TestDatabase {
    /// Create the store and its log table
    pub async fn new() -> Self {
        Self::with_config(Self::config()).await
    }

    pub async fn with_config(config: DatabaseSinkConfig) -> Self {
        let sink = DatabaseSink::connect(&config)
            .await
            .expect("Failed to create in-memory log store");
        Self {
            inner: Arc::new(sink),
        }
    }

    /// Configuration of an in-memory store
    pub fn config() -> DatabaseSinkConfig {
        DatabaseSinkConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1, // In-memory DB only supports 1 connection
            connection_timeout: 5,
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn sink(&self) -> Arc<DatabaseSink> {
        Arc::clone(&self.inner)
    }

    /// Drop the log table so every later write fails
    pub async fn drop_table(&self) {
        let statement = format!("DROP TABLE \"{}\"", self.inner.table());
        self.inner
            .connection()
            .execute_unprepared(&statement)
            .await
            .expect("Failed to drop log table");
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = DatabaseSink;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
