//! HTTP server implementation
//!
//! This module provides the demo HTTP server and the actix-web integration of
//! the logging pipeline.

pub mod middleware;

pub mod builder;
mod extract;
mod handlers;
pub mod server;
pub mod state;

pub use handlers::{CheckoutItem, CheckoutRequest, CheckoutResponse, checkout, health_check};
pub use server::{HttpServer, configure_routes};
pub use state::AppState;
