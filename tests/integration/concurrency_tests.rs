//! Concurrent request tests

use crate::common::fixtures::memory_pipeline;
use crate::common::EventAssertions;
use scopelog::core::context::PropertyBag;
use scopelog::core::event::LogLevel;
use scopelog::core::{RequestMetadata, RequestOutcome};
use std::collections::HashMap;

const REQUESTS: usize = 16;
const EVENTS_PER_REQUEST: usize = 25;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_never_share_context() {
    let (pipeline, console) = memory_pipeline();

    let handles = (0..REQUESTS)
        .map(|n| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                let correlation_id = format!("request-{}", n);
                let scope = pipeline.begin_request_scope(
                    RequestMetadata::new(format!("/items/{}", n))
                        .with_correlation_id(correlation_id.as_str()),
                );
                let context = scope.context().clone();

                for i in 0..EVENTS_PER_REQUEST {
                    let _step = context.push(PropertyBag::new().with("Step", i as i64));
                    pipeline.emit(
                        &context,
                        LogLevel::Information,
                        "step {Step}",
                        PropertyBag::new(),
                    );
                    tokio::task::yield_now().await;
                }

                pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });
                correlation_id
            })
        })
        .collect::<Vec<_>>();

    for result in futures::future::join_all(handles).await {
        result.unwrap();
    }
    let report = pipeline.shutdown().await;
    assert!(report.completed);

    let events = console.events();
    assert_eq!(events.len(), REQUESTS * (EVENTS_PER_REQUEST + 1));

    let mut per_request: HashMap<String, Vec<i64>> = HashMap::new();
    for event in &events {
        let correlation_id = event.text("CorrelationId").to_string();
        let n = correlation_id.trim_start_matches("request-");
        assert_eq!(event.text("RequestPath"), format!("/items/{}", n));
        if let Some(step) = event.properties().get("Step").and_then(|v| v.as_i64()) {
            per_request.entry(correlation_id).or_default().push(step);
        }
    }

    assert_eq!(per_request.len(), REQUESTS);
    let expected = (0..EVENTS_PER_REQUEST as i64).collect::<Vec<_>>();
    for steps in per_request.values() {
        assert_eq!(steps, &expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_derived_contexts_for_child_tasks() {
    let (pipeline, console) = memory_pipeline();
    let scope = pipeline.begin_request_scope(RequestMetadata::new("/batch"));

    let children = (0..4)
        .map(|n| {
            let child = scope.context().derive();
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                let _item = child.push(PropertyBag::new().with("Item", n as i64));
                pipeline.emit(&child, LogLevel::Information, "item {Item}", PropertyBag::new());
            })
        })
        .collect::<Vec<_>>();
    for child in futures::future::join_all(children).await {
        child.unwrap();
    }

    let correlation_id = scope.correlation_id().to_string();
    assert_eq!(scope.context().depth(), 1);
    pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });
    pipeline.shutdown().await;

    let events = console.events();
    assert_eq!(events.len(), 5);
    for event in &events {
        assert_eq!(event.text("CorrelationId"), correlation_id);
    }
    assert!(events[4].properties().get("Item").is_none());
}
