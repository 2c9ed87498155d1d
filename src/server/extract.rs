//! Extractors

use crate::core::context::ScopedContext;
use actix_web::dev::Payload;
use actix_web::error::ErrorInternalServerError;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{Ready, ready};

/// The request's logging context, placed there by
/// [`RequestTimingMiddleware`](crate::server::middleware::RequestTimingMiddleware)
impl FromRequest for ScopedContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<ScopedContext>()
                .cloned()
                .ok_or_else(|| {
                    ErrorInternalServerError("request timing middleware is not installed")
                }),
        )
    }
}
