//! actix-web integration tests for the demo routes

use crate::common::EventAssertions;
use crate::common::fixtures::memory_pipeline;
use actix_web::{App, test, web};
use scopelog::config::Config;
use scopelog::server::middleware::{CORRELATION_ID_HEADER, RequestTimingMiddleware};
use scopelog::server::{AppState, CheckoutResponse, configure_routes};
use serde_json::json;

#[actix_web::test]
async fn test_checkout_route_through_middleware() {
    let (pipeline, console) = memory_pipeline();
    let state = AppState::new(Config::default(), pipeline.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(RequestTimingMiddleware::new(pipeline.clone()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({ "items": [{ "sku": "A-1", "quantity": 2 }] }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());
    let correlation_id = res
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap();
    let body: CheckoutResponse = test::read_body_json(res).await;
    assert_eq!(body.item_count, 2);

    pipeline.shutdown().await;
    let events = console.events();
    assert_eq!(events.len(), 2);

    let placed = &events[0];
    assert_eq!(placed.text("OrderId"), body.order_id);
    assert_eq!(placed.integer("ItemCount"), 2);

    let completion = &events[1];
    completion.assert_identity();
    assert_eq!(completion.text("CorrelationId"), correlation_id);
    assert_eq!(completion.text("UserId"), "Anonymous");
    assert_eq!(completion.text("OperationName"), "CheckoutOrder");
    assert_eq!(completion.integer("StatusCode"), 200);
    assert!(completion.integer("ExecutionTimeMs") >= 0);
    assert!(completion.properties().get("OrderId").is_none());
}

#[actix_web::test]
async fn test_rejected_checkout_completes_once_as_failed() {
    let (pipeline, console) = memory_pipeline();
    let state = AppState::new(Config::default(), pipeline.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(RequestTimingMiddleware::new(pipeline.clone()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({ "items": [] }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 400);

    pipeline.shutdown().await;
    let events = console.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].level().to_string(), "Warning");
    assert_eq!(events[1].text("Outcome"), "Failed");
    assert_eq!(events[1].integer("StatusCode"), 400);
    assert_eq!(events[1].text("OperationName"), "CheckoutOrder");
}

#[actix_web::test]
async fn test_health_reports_sink_statistics() {
    let (pipeline, _console) = memory_pipeline();
    let state = AppState::new(Config::default(), pipeline.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(RequestTimingMiddleware::new(pipeline.clone()))
            .configure(configure_routes),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(res.status().is_success());
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sinks"][0]["sink"], "console");

    pipeline.shutdown().await;
}
