//! Test fixtures and data factories

use super::database::TestDatabase;
use scopelog::config::{DatabaseSinkConfig, PipelineConfig};
use scopelog::core::LoggingPipeline;
use scopelog::core::sinks::{MemorySink, Sink};
use std::sync::Arc;

/// Pipeline configuration with a fixed identity
pub fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        service_name: "checkout-api".to_string(),
        environment: "Test".to_string(),
        host: Some("test-host".to_string()),
        ..Default::default()
    }
}

/// Pipeline writing to a single in-memory sink standing in for the console
pub fn memory_pipeline() -> (LoggingPipeline, Arc<MemorySink>) {
    let console = Arc::new(MemorySink::new("console"));
    let pipeline = LoggingPipeline::with_sinks(pipeline_config(), vec![console.clone()]);
    (pipeline, console)
}

/// Pipeline writing to an in-memory console and the given store
pub fn pipeline_with_store(store: &TestDatabase) -> (LoggingPipeline, Arc<MemorySink>) {
    let console = Arc::new(MemorySink::new("console"));
    let sinks: Vec<Arc<dyn Sink>> = vec![console.clone(), store.sink()];
    let pipeline = LoggingPipeline::with_sinks(pipeline_config(), sinks);
    (pipeline, console)
}

/// Pipeline with a real store that connected, then lost its table
///
/// The store keeps its configured retry count; backoff is shortened.
pub async fn pipeline_with_lost_store(
    max_retries: u32,
) -> (LoggingPipeline, Arc<MemorySink>, TestDatabase) {
    let store = TestDatabase::with_config(DatabaseSinkConfig {
        max_retries,
        retry_backoff_ms: 1,
        ..TestDatabase::config()
    })
    .await;
    store.drop_table().await;
    let (pipeline, console) = pipeline_with_store(&store);
    (pipeline, console, store)
}

/// Pipeline whose store is unreachable for every write
pub fn pipeline_with_broken_store() -> (LoggingPipeline, Arc<MemorySink>, Arc<MemorySink>) {
    let console = Arc::new(MemorySink::new("console"));
    let store = Arc::new(MemorySink::failing("database"));
    let sinks: Vec<Arc<dyn Sink>> = vec![console.clone(), store.clone()];
    let pipeline = LoggingPipeline::with_sinks(pipeline_config(), sinks);
    (pipeline, console, store)
}
