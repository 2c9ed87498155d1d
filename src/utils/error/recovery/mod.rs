//! Error recovery utilities
//!
//! Bounded retry with exponential backoff, used by sinks whose writes can
//! fail transiently.

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::RetryConfig;
