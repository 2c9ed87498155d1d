//! Core of the logging pipeline
//!
//! Events are captured from a [`context::ScopedContext`], enriched into an
//! immutable [`event::LogEvent`] and fanned out by the
//! [`dispatcher::SinkDispatcher`] to every configured [`sinks::Sink`].

pub mod context;
pub mod dispatcher;
pub mod event;
pub mod pipeline;
pub mod sinks;
pub mod timing;

pub use pipeline::LoggingPipeline;
pub use timing::{RequestMetadata, RequestOutcome, RequestScope, TimerState};
