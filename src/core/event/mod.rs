//! Log events and their construction
//!
//! An event is captured from the caller's [`ScopedContext`](crate::core::context::ScopedContext),
//! enriched with service identity and frozen; sinks only ever read it.

mod enricher;
mod template;
mod types;
pub mod well_known;

#[cfg(test)]
mod tests;

pub use enricher::Enricher;
pub use template::render;
pub use types::{ExceptionDetails, LogEvent, LogLevel};
