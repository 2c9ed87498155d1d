//! Configuration loading tests

use crate::assert_err;
use scopelog::config::{Config, ConsoleFormat, SinkConfig};
use scopelog::core::LoggingPipeline;
use scopelog::core::event::LogLevel;
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
pipeline:
  service_name: checkout-api
  environment: Staging
  host: web-07
  minimum_level: Debug
  queue_capacity: 64
  shutdown_timeout_ms: 2000
  default_operation_name: null
  sinks:
    - kind: console
      format: json
    - kind: database
      url: "sqlite::memory:"
      max_connections: 1
      table: Logs
      column_limits:
        ClientIP: 45
diagnostics:
  level: warn
"#;

#[tokio::test]
async fn test_pipeline_from_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.pipeline.minimum_level, LogLevel::Debug);
    assert_eq!(config.pipeline.default_operation_name, None);
    assert_eq!(config.diagnostics.level, "warn");
    match &config.pipeline.sinks[0] {
        SinkConfig::Console(console) => assert_eq!(console.format, ConsoleFormat::Json),
        other => panic!("unexpected sink: {:?}", other),
    }

    let pipeline = LoggingPipeline::from_config(config.pipeline.clone())
        .await
        .unwrap();
    let stats = pipeline.stats();
    assert_eq!(stats.sinks.len(), 2);
    assert!(stats.sink("database").is_some());
    assert_eq!(pipeline.enricher().properties().len(), 3);
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_invalid_sink_rejected_at_startup() {
    let yaml = r#"
pipeline:
  sinks:
    - kind: database
      url: "mysql://localhost/logs"
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let error = assert_err!(Config::from_file(file.path()).await);
    assert!(error.to_string().contains("Sink #0"));
}

#[tokio::test]
async fn test_unknown_sink_kind_rejected() {
    let yaml = r#"
pipeline:
  sinks:
    - kind: carrier_pigeon
"#;
    assert!(Config::from_yaml(yaml).is_err());
}
