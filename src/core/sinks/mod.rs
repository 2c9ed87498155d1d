//! Event sinks
//!
//! A sink records finished events somewhere. Sinks are registered with the
//! [`SinkDispatcher`](crate::core::dispatcher::SinkDispatcher) at startup and
//! each one is driven by its own worker, so a slow or failing sink never holds
//! up the others.

mod console;
pub mod database;
mod memory;

pub use console::ConsoleSink;
pub use database::{ColumnKind, ColumnMapping, ColumnSpec, DatabaseSink, MappedRow, StoredLogRow};
pub use memory::MemorySink;

use crate::config::SinkConfig;
use crate::core::event::LogEvent;
use crate::utils::error::{RetryPolicy, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A destination for log events
#[async_trait]
pub trait Sink: Send + Sync {
    /// Name used in diagnostics and statistics
    fn name(&self) -> &str;

    /// Record one event
    async fn write(&self, event: &LogEvent) -> Result<()>;

    /// Retry behaviour for failed writes
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Flush buffered output; called once when the sink's queue closes
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Build a sink from its configuration, performing startup side effects
/// such as connecting and provisioning the table
pub async fn build_sink(config: &SinkConfig) -> Result<Arc<dyn Sink>> {
    match config {
        SinkConfig::Console(console) => Ok(Arc::new(ConsoleSink::stdout(console.clone()))),
        SinkConfig::Database(database) => Ok(Arc::new(DatabaseSink::connect(database).await?)),
    }
}
