//! Request timing middleware

use super::helpers::{CORRELATION_ID_HEADER, REQUEST_ID_HEADER, describe_error, request_metadata};
use crate::core::{LoggingPipeline, RequestOutcome};
use actix_web::HttpMessage;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Opens a logging scope around every request
///
/// The request's [`ScopedContext`](crate::core::context::ScopedContext) is
/// placed in request extensions for handlers to extract. One completion event
/// is emitted per request, whether the handler succeeds, fails or the request
/// is dropped mid-flight.
#[derive(Clone)]
pub struct RequestTimingMiddleware {
    pipeline: LoggingPipeline,
}

impl RequestTimingMiddleware {
    pub fn new(pipeline: LoggingPipeline) -> Self {
        Self { pipeline }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTimingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimingMiddlewareService {
            service,
            pipeline: self.pipeline.clone(),
        }))
    }
}

/// Service implementation for request timing middleware
pub struct RequestTimingMiddlewareService<S> {
    service: S,
    pipeline: LoggingPipeline,
}

impl<S, B> Service<ServiceRequest> for RequestTimingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let scope = self.pipeline.begin_request_scope(request_metadata(&req));
        req.extensions_mut().insert(scope.context().clone());

        let correlation_id = scope.correlation_id().to_string();
        let request_id = scope.request_id().to_string();
        debug!("Processing request: {}", request_id);

        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(mut res) => {
                    let status_code = res.status().as_u16();
                    let outcome = match res.response().error() {
                        Some(error) => RequestOutcome::Failed {
                            status_code: Some(status_code),
                            error: describe_error(error),
                        },
                        None => RequestOutcome::Completed { status_code },
                    };
                    scope.complete(outcome);

                    let headers = res.headers_mut();
                    set_header(headers, CORRELATION_ID_HEADER, &correlation_id);
                    set_header(headers, REQUEST_ID_HEADER, &request_id);
                    Ok(res)
                }
                Err(error) => {
                    let status_code = error.as_response_error().status_code().as_u16();
                    scope.complete(RequestOutcome::Failed {
                        status_code: Some(status_code),
                        error: describe_error(&error),
                    });
                    Err(error)
                }
            }
        })
    }
}

fn set_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}
