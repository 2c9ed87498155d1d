//! Request scope and completion event tests

use crate::common::fixtures::{memory_pipeline, pipeline_with_broken_store, pipeline_with_lost_store};
use scopelog::config::DatabaseSinkConfig;
use crate::common::EventAssertions;
use scopelog::core::context::{PropertyBag, ScopedContext};
use scopelog::core::event::LogLevel;
use scopelog::core::{RequestMetadata, RequestOutcome};

#[tokio::test]
async fn test_checkout_scenario() {
    let (pipeline, console) = memory_pipeline();
    let scope = pipeline.begin_request_scope(RequestMetadata::new("/checkout").with_method("POST"));
    let context = scope.context().clone();

    {
        context.annotate("OperationName", "CheckoutOrder");
        let _order = context.push(PropertyBag::new().with("OrderId", "o-1"));
        pipeline.emit(
            &context,
            LogLevel::Information,
            "Order {OrderId} placed",
            PropertyBag::new(),
        );
    }
    pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });

    pipeline.shutdown().await;
    let events = console.events();
    assert_eq!(events.len(), 2);

    let completion = &events[1];
    completion.assert_identity();
    assert_eq!(completion.text("UserId"), "Anonymous");
    assert_eq!(completion.text("OperationName"), "CheckoutOrder");
    assert_eq!(completion.text("RequestPath"), "/checkout");
    assert!(completion.integer("ExecutionTimeMs") >= 0);
    assert_eq!(completion.level(), LogLevel::Information);

    assert_eq!(events[0].text("OrderId"), "o-1");
    assert_eq!(events[0].text("CorrelationId"), completion.text("CorrelationId"));
    assert_eq!(context.depth(), 0);
}

#[tokio::test]
async fn test_unreachable_store_isolated_from_console() {
    let (pipeline, console, store) = pipeline_with_broken_store();

    let scope = pipeline.begin_request_scope(RequestMetadata::new("/checkout"));
    let event = pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });
    assert!(event.is_some());

    let report = pipeline.shutdown().await;
    assert!(report.completed);
    assert_eq!(console.len(), 1);
    assert!(store.is_empty());

    let stats = pipeline.stats();
    assert_eq!(stats.sink("database").map(|s| s.write_failures), Some(1));
    assert_eq!(stats.sink("console").map(|s| s.write_failures), Some(0));
    assert_eq!(stats.sink("console").map(|s| s.delivered), Some(1));
}

#[tokio::test]
async fn test_database_failure_after_startup_retries_then_counts_once() {
    let max_retries = DatabaseSinkConfig::default().max_retries;
    let (pipeline, console, store) = pipeline_with_lost_store(max_retries).await;

    let scope = pipeline.begin_request_scope(RequestMetadata::new("/checkout").with_method("POST"));
    let event = pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });
    assert!(event.is_some());

    let report = pipeline.shutdown().await;
    assert!(report.completed);
    assert_eq!(console.len(), 1);
    assert_eq!(console.events()[0].text("RequestPath"), "/checkout");

    let stats = pipeline.stats();
    let database = stats.sink("database").unwrap();
    assert_eq!(database.write_failures, 1);
    assert_eq!(database.retries, u64::from(max_retries));
    assert_eq!(database.delivered, 0);
    assert_eq!(stats.sink("console").map(|s| s.delivered), Some(1));
    assert!(store.fetch_recent(1).await.is_err());
}

#[tokio::test]
async fn test_explicit_fields_override_context_but_not_identity() {
    let (pipeline, console) = memory_pipeline();
    let context = ScopedContext::new();
    let _frame = context.push(
        PropertyBag::new()
            .with("UserId", "from-context")
            .with("ServiceName", "spoofed"),
    );

    pipeline.emit(
        &context,
        LogLevel::Warning,
        "override",
        PropertyBag::new()
            .with("UserId", "explicit")
            .with("Environment", "spoofed"),
    );
    pipeline.shutdown().await;

    let event = &console.events()[0];
    assert_eq!(event.text("UserId"), "explicit");
    assert_eq!(event.text("ServiceName"), "checkout-api");
    assert_eq!(event.text("Environment"), "Test");
}

#[tokio::test]
async fn test_emitted_event_is_frozen() {
    let (pipeline, _console) = memory_pipeline();
    let context = ScopedContext::new();
    let mut frame = context.push(PropertyBag::new().with("Stage", "before"));

    let event = pipeline
        .emit(&context, LogLevel::Information, "snapshot", PropertyBag::new())
        .unwrap();
    frame.release();
    let _later = context.push(PropertyBag::new().with("Stage", "after"));

    assert_eq!(event.text("Stage"), "before");
    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_events_after_shutdown_are_counted_as_dropped() {
    let (pipeline, console) = memory_pipeline();
    pipeline.shutdown().await;

    let context = ScopedContext::new();
    pipeline.emit(&context, LogLevel::Error, "too late", PropertyBag::new());

    assert!(console.is_empty());
    assert_eq!(pipeline.stats().total_dropped(), 1);
}
