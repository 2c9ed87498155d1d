//! Request timing scopes
//!
//! [`LoggingPipeline::begin_request_scope`] pushes the request frame and starts
//! the clock; completing the returned [`RequestScope`] (explicitly, or by
//! dropping it) emits one completion event and pops the frame.

mod types;


pub use types::{RequestMetadata, RequestOutcome, TimerState};

use crate::core::context::{PropertyBag, PropertyValue, ScopeHandle, ScopedContext};
use crate::core::event::{LogEvent, well_known};
use crate::core::pipeline::LoggingPipeline;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Longest inbound correlation id that is reused as-is
pub const MAX_CORRELATION_ID_LEN: usize = 256;

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Sortable request id: UTC timestamp down to microseconds plus a process-wide sequence
pub fn next_request_id() -> String {
    let seq = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{:06}", Utc::now().format("%Y%m%d%H%M%S%6f"), seq % 1_000_000)
}

/// Reuse a non-empty inbound correlation id, otherwise generate one
pub fn resolve_correlation_id(inbound: Option<&str>) -> String {
    match inbound.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => crate::core::sinks::database::truncate(
            well_known::CORRELATION_ID,
            id,
            MAX_CORRELATION_ID_LEN,
        ),
        None => Uuid::new_v4().to_string(),
    }
}

/// The active timing scope of one request
pub struct RequestScope {
    pipeline: LoggingPipeline,
    context: ScopedContext,
    frame: Option<ScopeHandle>,
    started: Instant,
    correlation_id: String,
    request_id: String,
    has_method: bool,
    state: TimerState,
}

impl LoggingPipeline {
    /// Push the request frame on a fresh context and start timing
    pub fn begin_request_scope(&self, metadata: RequestMetadata) -> RequestScope {
        self.begin_request_scope_in(ScopedContext::new(), metadata)
    }

    /// Like [`begin_request_scope`](Self::begin_request_scope), on an existing context
    pub fn begin_request_scope_in(
        &self,
        context: ScopedContext,
        metadata: RequestMetadata,
    ) -> RequestScope {
        let correlation_id = resolve_correlation_id(metadata.correlation_id.as_deref());
        let request_id = next_request_id();
        let operation_name = metadata
            .operation_name
            .clone()
            .or_else(|| self.config().default_operation_name.clone());

        let mut frame = PropertyBag::new()
            .with(well_known::CORRELATION_ID, correlation_id.as_str())
            .with(well_known::REQUEST_ID, request_id.as_str())
            .with(
                well_known::USER_ID,
                metadata
                    .user_id
                    .clone()
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| well_known::ANONYMOUS_USER.to_string()),
            )
            .with(well_known::REQUEST_PATH, metadata.path.as_str())
            .with(
                well_known::CLIENT_IP,
                metadata
                    .client_address
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| well_known::UNKNOWN_CLIENT.to_string()),
            );
        if let Some(user_agent) = &metadata.user_agent {
            frame.insert(well_known::USER_AGENT, user_agent.as_str());
        }
        if let Some(method) = &metadata.method {
            frame.insert(well_known::REQUEST_METHOD, method.as_str());
        }
        if let Some(operation_name) = operation_name {
            frame.insert(well_known::OPERATION_NAME, operation_name);
        }

        debug!(
            correlation_id = %correlation_id,
            request_id = %request_id,
            path = %metadata.path,
            "Request scope started"
        );

        let handle = context.push_anchor(frame);
        RequestScope {
            pipeline: self.clone(),
            context,
            frame: Some(handle),
            started: Instant::now(),
            correlation_id,
            request_id,
            has_method: metadata.method.is_some(),
            state: TimerState::Active,
        }
    }

    /// Emit the completion event and pop the request frame
    pub fn end_request_scope(
        &self,
        scope: RequestScope,
        outcome: RequestOutcome,
    ) -> Option<Arc<LogEvent>> {
        scope.complete(outcome)
    }
}

impl RequestScope {
    /// Context carrying the request frame; clone it into handlers
    pub fn context(&self) -> &ScopedContext {
        &self.context
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Set a property on this request's own frame, whatever else is on the context
    pub fn annotate(&self, name: impl Into<String>, value: impl Into<PropertyValue>) -> bool {
        self.frame
            .as_ref()
            .is_some_and(|frame| frame.annotate(name, value))
    }

    /// Finish the request; returns the completion event, or `None` if it was already finished
    pub fn complete(mut self, outcome: RequestOutcome) -> Option<Arc<LogEvent>> {
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: RequestOutcome) -> Option<Arc<LogEvent>> {
        if self.state == TimerState::Idle {
            return None;
        }
        self.state = TimerState::Idle;

        let elapsed_ms = i64::try_from(self.started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let mut fields = PropertyBag::new()
            .with(well_known::EXECUTION_TIME_MS, elapsed_ms)
            .with(well_known::OUTCOME, outcome.label());
        if let Some(status_code) = outcome.status_code() {
            fields.insert(well_known::STATUS_CODE, status_code);
        }

        let template = outcome.message_template(self.has_method);
        let exception = match outcome {
            RequestOutcome::Failed { error, .. } => Some(error),
            _ => None,
        };
        let event = self
            .pipeline
            .emit_completion(&self.context, template, fields, exception);

        if let Some(mut frame) = self.frame.take() {
            frame.release();
        }
        debug!(
            request_id = %self.request_id,
            elapsed_ms,
            "Request scope completed"
        );
        Some(event)
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if self.state == TimerState::Active {
            debug!(request_id = %self.request_id, "Request scope dropped while active");
            self.finish(RequestOutcome::Cancelled);
        }
    }
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("correlation_id", &self.correlation_id)
            .field("request_id", &self.request_id)
            .field("state", &self.state)
            .finish()
    }
}
