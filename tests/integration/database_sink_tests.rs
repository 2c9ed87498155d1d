//! Relational sink tests against in-memory SQLite

use crate::common::TestDatabase;
use crate::common::fixtures::pipeline_with_store;
use crate::assert_ok;
use scopelog::config::ColumnLimits;
use scopelog::core::context::{PropertyBag, PropertyValue, ScopedContext};
use scopelog::core::event::LogLevel;
use scopelog::core::{RequestMetadata, RequestOutcome};

#[tokio::test]
async fn test_unmapped_fields_round_trip() {
    let store = TestDatabase::new().await;
    let (pipeline, _console) = pipeline_with_store(&store);

    pipeline.emit(
        &ScopedContext::new(),
        LogLevel::Information,
        "values {a} and {b}",
        PropertyBag::new().with("a", 1).with("b", 2),
    );
    pipeline.shutdown().await;

    let rows = assert_ok!(store.fetch_recent(10).await);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property("a"), Some(&PropertyValue::Integer(1)));
    assert_eq!(rows[0].property("b"), Some(&PropertyValue::Integer(2)));
    assert_eq!(rows[0].message.as_deref(), Some("values 1 and 2"));
    assert_eq!(
        rows[0].property("ServiceName").and_then(|v| v.as_str()),
        Some("checkout-api")
    );
}

#[tokio::test]
async fn test_long_client_address_is_truncated() {
    let store = TestDatabase::new().await;
    let (pipeline, console) = pipeline_with_store(&store);

    let scope = pipeline.begin_request_scope(
        RequestMetadata::new("/checkout").with_client_address("7".repeat(300)),
    );
    pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });
    pipeline.shutdown().await;

    let stats = pipeline.stats();
    assert_eq!(stats.total_write_failures(), 0);
    assert_eq!(console.len(), 1);

    let rows = assert_ok!(store.fetch_recent(1).await);
    let stored = rows[0]
        .columns
        .get("ClientIP")
        .and_then(|v| v.as_str())
        .unwrap();
    assert_eq!(stored.chars().count(), ColumnLimits::default().client_ip);
    assert!(rows[0].overflow.get("ClientIP").is_none());
}

#[tokio::test]
async fn test_request_fields_land_in_columns() {
    let store = TestDatabase::new().await;
    let (pipeline, _console) = pipeline_with_store(&store);

    let scope = pipeline.begin_request_scope(
        RequestMetadata::new("/orders")
            .with_method("GET")
            .with_user("user-9")
            .with_user_agent("curl/8.0"),
    );
    let correlation_id = scope.correlation_id().to_string();
    pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 204 });
    pipeline.shutdown().await;

    let rows = assert_ok!(store.fetch_recent(1).await);
    let row = &rows[0];
    let column = |name: &str| row.columns.get(name).and_then(|v| v.as_str());
    assert_eq!(column("CorrelationId"), Some(correlation_id.as_str()));
    assert_eq!(column("UserId"), Some("user-9"));
    assert_eq!(column("RequestPath"), Some("/orders"));
    assert_eq!(column("UserAgent"), Some("curl/8.0"));
    assert_eq!(column("Environment"), Some("Test"));
    assert_eq!(column("OperationName"), Some("UnknownOperation"));
    assert!(row.columns.get("ExecutionTimeMs").and_then(|v| v.as_i64()) >= Some(0));
    assert_eq!(row.overflow.get("StatusCode"), Some(&PropertyValue::Integer(204)));
    assert_eq!(
        row.overflow.get("RequestMethod").and_then(|v| v.as_str()),
        Some("GET")
    );
    assert_eq!(row.level.as_deref(), Some("Information"));
}

#[tokio::test]
async fn test_custom_table_and_limits() {
    let mut config = TestDatabase::config();
    config.table = "RequestLogs".to_string();
    config.column_limits.request_path = 8;
    let store = TestDatabase::with_config(config).await;
    let (pipeline, _console) = pipeline_with_store(&store);

    let scope = pipeline.begin_request_scope(RequestMetadata::new("/a/very/long/path"));
    pipeline.end_request_scope(scope, RequestOutcome::Cancelled);
    pipeline.shutdown().await;

    assert_eq!(store.table(), "RequestLogs");
    let rows = assert_ok!(store.fetch_recent(1).await);
    assert_eq!(
        rows[0].columns.get("RequestPath").and_then(|v| v.as_str()),
        Some("/a/very/")
    );
}
