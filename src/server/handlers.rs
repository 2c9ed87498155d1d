//! HTTP route handlers

use crate::core::context::{PropertyBag, ScopedContext};
use crate::core::event::{LogLevel, well_known};
use crate::server::state::AppState;
use actix_web::{HttpResponse, error, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Health check endpoint handler
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "sinks": state.pipeline.stats().sinks,
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub item_count: u32,
}

/// Place an order
pub async fn checkout(
    state: web::Data<AppState>,
    context: ScopedContext,
    body: web::Json<CheckoutRequest>,
) -> actix_web::Result<HttpResponse> {
    context.annotate(well_known::OPERATION_NAME, "CheckoutOrder");

    let order_id = Uuid::new_v4().to_string();
    let item_count = body.items.iter().map(|i| i.quantity).sum::<u32>();
    let _order = context.push(PropertyBag::new().with("OrderId", order_id.as_str()));

    if item_count == 0 {
        state.pipeline.emit(
            &context,
            LogLevel::Warning,
            "Rejected empty order {OrderId}",
            PropertyBag::new(),
        );
        return Err(error::ErrorBadRequest("order has no items"));
    }

    state.pipeline.emit(
        &context,
        LogLevel::Information,
        "Order {OrderId} placed with {ItemCount} items",
        PropertyBag::new().with("ItemCount", item_count),
    );

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        order_id,
        item_count,
    }))
}
