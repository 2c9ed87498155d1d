//! Helper functions for middleware

use crate::core::RequestMetadata;
use crate::core::event::ExceptionDetails;
use actix_web::HttpMessage;
use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use std::net::SocketAddr;

/// Header carrying the correlation id across services
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
/// Header echoing the request id on responses
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authenticated user id, inserted into request extensions by an auth layer
/// that runs before the timing middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity(pub String);

/// Client address without the port; honours `Forwarded` / `X-Forwarded-For`
pub fn client_address(req: &ServiceRequest) -> Option<String> {
    let info = req.connection_info();
    let raw = info.realip_remote_addr()?;
    match raw.parse::<SocketAddr>() {
        Ok(addr) => Some(addr.ip().to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

/// Everything the timing scope needs to know about an incoming request
pub fn request_metadata(req: &ServiceRequest) -> RequestMetadata {
    let header_value = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string())
    };
    let user_id = req.extensions().get::<UserIdentity>().map(|u| u.0.clone());

    RequestMetadata {
        method: Some(req.method().to_string()),
        path: req.path().to_string(),
        user_id,
        client_address: client_address(req),
        user_agent: header_value(header::USER_AGENT.as_str()),
        correlation_id: header_value(CORRELATION_ID_HEADER),
        operation_name: None,
    }
}

/// Failure details for an error produced by a handler
pub fn describe_error(error: &actix_web::Error) -> ExceptionDetails {
    let status = error.as_response_error().status_code();
    ExceptionDetails::new(
        status.canonical_reason().unwrap_or("Error"),
        error.to_string(),
    )
}
