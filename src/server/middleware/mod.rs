//! HTTP middleware implementations
//!
//! - Request timing: per-request logging scope, correlation and completion events

mod helpers;
mod request_timing;


pub use helpers::{
    CORRELATION_ID_HEADER, REQUEST_ID_HEADER, UserIdentity, client_address, describe_error,
    request_metadata,
};
pub use request_timing::{RequestTimingMiddleware, RequestTimingMiddlewareService};
